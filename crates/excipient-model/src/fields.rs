use serde::{Deserialize, Serialize};

/// Column aliases used to pull product, description, and excipient text out
/// of a [`Record`](crate::Record). Each list is searched in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAliases {
    pub product: Vec<String>,
    pub description: Vec<String>,
    pub excipients: Vec<String>,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            product: vec![
                "English Product Name".to_string(),
                "English Common Name".to_string(),
                "English Drug Name".to_string(),
            ],
            description: vec![
                "Drug Description".to_string(),
                "English Description".to_string(),
            ],
            excipients: vec!["Excipients".to_string()],
        }
    }
}
