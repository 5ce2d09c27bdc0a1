//! Integration tests for the extraction pipeline stages.

use std::fs;
use std::path::Path;

use excipient_cli::pipeline::{CatalogConfig, RunConfig, run_catalog, run_extraction};
use excipient_cli::types::SourceCounts;
use excipient_core::{LocatorStrategy, ProcessingOptions};
use excipient_output::OutputLayout;

const PRODUCTS_CSV: &str = "\
English Product Name,English Common Name,Drug Description,Excipients
Acme Pain Relief,,\"INACTIVE INGREDIENTS: lactose, 50mg starch, magnesium stearate (colorant).\",
,Cough Syrup,Sweet syrup for coughs.,\"Sucrose, Water 5 mL, Sodium Benzoate\"
Gel Caps,,\"Other ingredients: gelatin, hard gelatin capsule shell, titanium dioxide\",
Mystery,,Take one daily.,
Acme Pain Relief,,Inactive ingredients: talc.,
";

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("products.csv");
    fs::write(&path, PRODUCTS_CSV).expect("write input");
    path
}

fn run_config(dir: &Path, options: ProcessingOptions, layout: OutputLayout) -> RunConfig {
    RunConfig {
        input: write_input(dir),
        output: dir.join("out").join("drug_excipients.csv"),
        vocabulary: None,
        options,
        layout,
    }
}

#[test]
fn run_writes_one_row_per_record() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = run_config(dir.path(), ProcessingOptions::default(), OutputLayout::WithNotes);

    let result = run_extraction(&config).expect("run extraction");

    assert_eq!(result.records, 5);
    assert_eq!(result.rows, 5);
    assert_eq!(
        result.sources,
        SourceCounts {
            description: 3,
            excipients_field: 1,
            missing: 1,
        }
    );
    assert_eq!(result.empty_rows, 1);

    let contents = fs::read_to_string(&config.output).expect("read output");
    insta::assert_snapshot!(contents, @r"
    product,excipients,notes
    Acme Pain Relief,lactose; starch; magnesium stearate,
    Cough Syrup,sucrose; water; sodium benzoate,
    Gel Caps,gelatin; titanium dioxide,hard gelatin capsule shell
    Mystery,,
    Acme Pain Relief,talc,
    ");
}

#[test]
fn run_can_drop_notes_and_duplicate_products() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ProcessingOptions {
        strategy: LocatorStrategy::SingleLabel,
        dedupe_products: true,
        ..ProcessingOptions::default()
    };
    let config = run_config(dir.path(), options, OutputLayout::ExcipientsOnly);

    let result = run_extraction(&config).expect("run extraction");

    assert_eq!(result.records, 5);
    assert_eq!(result.rows, 4);
    let contents = fs::read_to_string(&config.output).expect("read output");
    insta::assert_snapshot!(contents, @r"
    product,excipients
    Acme Pain Relief,lactose; starch; magnesium stearate
    Cough Syrup,sucrose; water; sodium benzoate
    Gel Caps,
    Mystery,
    ");
}

#[test]
fn catalog_lists_distinct_excipients() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = CatalogConfig {
        input: write_input(dir.path()),
        output: dir.path().join("cleaned_excipients.csv"),
        vocabulary: None,
        options: ProcessingOptions::default(),
    };

    let result = run_catalog(&config).expect("run catalog");

    assert_eq!(result.excipients, 9);
    let contents = fs::read_to_string(&config.output).expect("read output");
    insta::assert_snapshot!(contents, @r"
    excipient
    gelatin
    lactose
    magnesium stearate
    sodium benzoate
    starch
    sucrose
    talc
    titanium dioxide
    water
    ");
}

#[test]
fn vocabulary_override_is_applied() {
    let dir = tempfile::tempdir().expect("temp dir");
    let vocabulary = dir.path().join("vocabulary.toml");
    fs::write(
        &vocabulary,
        r#"
[locator]
single_label = 'other ingredients:'
labels = ["other ingredients"]
list_verbs = []
truncate_markers = []
removals = []

[normalizer]
units = ["mg", "ml"]

[classifier]
note_keywords = ["shell"]
connectives = ["and"]
contains_words = ["contains"]
suspension_word = "suspension"
product_echo = false
"#,
    )
    .expect("write vocabulary");
    let mut config = run_config(
        dir.path(),
        ProcessingOptions::default(),
        OutputLayout::WithNotes,
    );
    config.vocabulary = Some(vocabulary);

    let result = run_extraction(&config).expect("run extraction");

    assert_eq!(result.sources.description, 1);
    let contents = fs::read_to_string(&config.output).expect("read output");
    assert!(contents.contains("Gel Caps,gelatin; titanium dioxide,hard gelatin capsule shell"));
    assert!(contents.contains("Cough Syrup,sucrose; water; sodium benzoate,"));
}

#[test]
fn missing_input_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = RunConfig {
        input: dir.path().join("absent.xlsx"),
        output: dir.path().join("drug_excipients.csv"),
        vocabulary: None,
        options: ProcessingOptions::default(),
        layout: OutputLayout::WithNotes,
    };

    let error = run_extraction(&config).expect_err("missing input");

    assert!(format!("{error:#}").contains("absent.xlsx"));
    assert!(!config.output.exists());
}

#[test]
fn broken_vocabulary_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let vocabulary = dir.path().join("broken.toml");
    fs::write(&vocabulary, "[locator\n").expect("write vocabulary");
    let mut config = run_config(
        dir.path(),
        ProcessingOptions::default(),
        OutputLayout::WithNotes,
    );
    config.vocabulary = Some(vocabulary);

    let error = run_extraction(&config).expect_err("broken vocabulary");

    assert!(format!("{error:#}").contains("broken.toml"));
    assert!(!config.output.exists());
}
