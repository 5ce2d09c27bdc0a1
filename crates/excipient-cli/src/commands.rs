use anyhow::{Context, Result};
use comfy_table::Table;

use excipient_cli::pipeline::{CatalogConfig, RunConfig, run_catalog, run_extraction};
use excipient_cli::types::{CatalogResult, RunResult};
use excipient_core::{LocatorStrategy, ProcessingOptions, Vocabulary, load_vocabulary};
use excipient_output::OutputLayout;

use crate::cli::{CatalogArgs, ExtractionArgs, LayoutArg, RunArgs, StrategyArg, VocabularyArgs};
use crate::summary::apply_table_style;

pub fn run_command(args: &RunArgs) -> Result<RunResult> {
    let config = RunConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        vocabulary: args.extraction.vocabulary.clone(),
        options: ProcessingOptions {
            dedupe_products: args.dedupe_products,
            ..processing_options(&args.extraction)
        },
        layout: match args.layout {
            LayoutArg::WithNotes => OutputLayout::WithNotes,
            LayoutArg::ExcipientsOnly => OutputLayout::ExcipientsOnly,
        },
    };
    run_extraction(&config)
}

pub fn catalog_command(args: &CatalogArgs) -> Result<CatalogResult> {
    let config = CatalogConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        vocabulary: args.extraction.vocabulary.clone(),
        options: processing_options(&args.extraction),
    };
    run_catalog(&config)
}

pub fn vocabulary_command(args: &VocabularyArgs) -> Result<()> {
    let vocabulary = load_vocabulary(args.vocabulary.as_deref()).context("load vocabulary")?;
    let mut table = Table::new();
    table.set_header(vec!["Table", "Entries"]);
    apply_table_style(&mut table);
    for (name, entries) in vocabulary_rows(&vocabulary) {
        table.add_row(vec![name.to_string(), entries]);
    }
    println!("{table}");
    Ok(())
}

fn processing_options(args: &ExtractionArgs) -> ProcessingOptions {
    ProcessingOptions {
        strategy: match args.strategy {
            StrategyArg::SingleLabel => LocatorStrategy::SingleLabel,
            StrategyArg::MultiLabel => LocatorStrategy::MultiLabel,
        },
        product_echo: !args.no_product_echo,
        ..ProcessingOptions::default()
    }
}

fn vocabulary_rows(vocabulary: &Vocabulary) -> Vec<(&'static str, String)> {
    let fields = &vocabulary.fields;
    let locator = &vocabulary.locator;
    let normalizer = &vocabulary.normalizer;
    let classifier = &vocabulary.classifier;
    vec![
        ("Product columns", fields.product.join(", ")),
        ("Description columns", fields.description.join(", ")),
        ("Excipient columns", fields.excipients.join(", ")),
        ("Single label", locator.single_label.clone()),
        ("Labels", locator.labels.join(", ")),
        ("List verbs", locator.list_verbs.join(", ")),
        ("Truncate markers", locator.truncate_markers.join("\n")),
        ("Removals", locator.removals.join("\n")),
        ("Units", normalizer.units.join(", ")),
        ("Note keywords", classifier.note_keywords.join(", ")),
        ("Note patterns", classifier.note_patterns.join("\n")),
        ("Connectives", classifier.connectives.join(", ")),
        ("Contains words", classifier.contains_words.join(", ")),
        (
            "Suspension rule",
            format!(
                "{} with more than {} words",
                classifier.suspension_word, classifier.suspension_word_limit
            ),
        ),
        (
            "Product echo",
            if classifier.product_echo {
                format!("on (words of {}+ letters)", classifier.product_echo_min_len)
            } else {
                "off".to_string()
            },
        ),
    ]
}
