pub mod classifier;
pub mod dedupe;
pub mod error;
pub mod locator;
pub mod normalizer;
pub mod pipeline;
pub mod product;
pub mod rules;
pub mod vocabulary;

pub use classifier::classify;
pub use dedupe::{dedupe_by_product, dedupe_preserving_order, excipient_catalog};
pub use error::{Result, VocabularyError};
pub use locator::{LocatorStrategy, locate_excipients};
pub use normalizer::normalize;
pub use pipeline::{ExcipientPipeline, ProcessingOptions};
pub use product::{product_terms, select_from_values, select_product};
pub use rules::ExcipientRules;
pub use vocabulary::{
    ClassifierVocabulary, LocatorVocabulary, NormalizerVocabulary, VOCABULARY_ENV_VAR,
    Vocabulary, load_vocabulary,
};
