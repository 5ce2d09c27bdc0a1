use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator used when a token list is flattened into one output cell.
pub const LIST_SEPARATOR: &str = "; ";

/// Where a record's excipient text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExcipientSource {
    /// Located inside the free-text description.
    Description,
    /// Taken from the literal excipients column.
    ExcipientsField,
    /// Nothing usable was found.
    Missing,
}

impl fmt::Display for ExcipientSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Description => "description",
            Self::ExcipientsField => "excipients field",
            Self::Missing => "missing",
        };
        f.write_str(label)
    }
}

/// Excipient and note tokens for one record.
///
/// Both lists are free of duplicates and never share a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classified {
    pub excipients: Vec<String>,
    pub notes: Vec<String>,
}

/// One output row per input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub product: String,
    pub excipients: Vec<String>,
    pub notes: Vec<String>,
    pub source: ExcipientSource,
}

impl ResultRow {
    pub fn new(product: impl Into<String>, classified: Classified, source: ExcipientSource) -> Self {
        Self {
            product: product.into(),
            excipients: classified.excipients,
            notes: classified.notes,
            source,
        }
    }

    pub fn excipients_joined(&self) -> String {
        self.excipients.join(LIST_SEPARATOR)
    }

    pub fn notes_joined(&self) -> String {
        self.notes.join(LIST_SEPARATOR)
    }

    /// Whether the row carries neither excipients nor notes.
    pub fn is_empty(&self) -> bool {
        self.excipients.is_empty() && self.notes.is_empty()
    }
}
