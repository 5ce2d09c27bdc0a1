//! Vocabulary tables that drive locating and classification.
//!
//! The tables live in a TOML document so rule refinements are data edits.
//! A default copy is compiled into the crate; a replacement can be supplied
//! by path or through the `EXCIPIENT_VOCABULARY` environment variable.

use std::path::{Path, PathBuf};

use excipient_model::FieldAliases;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VocabularyError};

const BUILTIN_VOCABULARY: &str = include_str!("../data/vocabulary.toml");
const BUILTIN_LABEL: &str = "<builtin>";
pub const VOCABULARY_ENV_VAR: &str = "EXCIPIENT_VOCABULARY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub fields: FieldAliases,
    pub locator: LocatorVocabulary,
    pub normalizer: NormalizerVocabulary,
    pub classifier: ClassifierVocabulary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorVocabulary {
    /// Regex for the single-label strategy; the list starts after its match.
    pub single_label: String,
    /// Literal labels that open an ingredient segment.
    pub labels: Vec<String>,
    /// Literal verbs that may sit between a label and its list.
    pub list_verbs: Vec<String>,
    /// Regexes; everything from the earliest match onward is dropped.
    pub truncate_markers: Vec<String>,
    /// Regexes for explanatory clauses removed from the located text.
    pub removals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerVocabulary {
    /// Unit abbreviations stripped together with a preceding quantity.
    pub units: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVocabulary {
    /// Whole words that mark a token as a note.
    pub note_keywords: Vec<String>,
    /// Regexes that mark a token as a note.
    #[serde(default)]
    pub note_patterns: Vec<String>,
    /// Words that join short ingredient lists inside one token.
    pub connectives: Vec<String>,
    /// Words that separate a descriptive preamble from the ingredient.
    pub contains_words: Vec<String>,
    pub suspension_word: String,
    #[serde(default = "default_suspension_word_limit")]
    pub suspension_word_limit: usize,
    #[serde(default = "default_product_echo")]
    pub product_echo: bool,
    #[serde(default = "default_product_echo_min_len")]
    pub product_echo_min_len: usize,
}

fn default_suspension_word_limit() -> usize {
    2
}

fn default_product_echo() -> bool {
    true
}

fn default_product_echo_min_len() -> usize {
    4
}

impl Vocabulary {
    /// The vocabulary compiled into the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_VOCABULARY, Path::new(BUILTIN_LABEL))
    }

    /// Read a vocabulary document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    fn from_toml_str(contents: &str, origin: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|source| VocabularyError::Toml {
            path: origin.to_path_buf(),
            source,
        })
    }
}

/// Resolve the active vocabulary: an explicit path wins, then the
/// `EXCIPIENT_VOCABULARY` environment variable, then the built-in tables.
pub fn load_vocabulary(explicit: Option<&Path>) -> Result<Vocabulary> {
    let from_env = std::env::var_os(VOCABULARY_ENV_VAR).map(PathBuf::from);
    match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => {
            debug!(path = %path.display(), "loading vocabulary override");
            Vocabulary::from_path(&path)
        }
        None => Vocabulary::builtin(),
    }
}
