//! Source records: one ordered field map per spreadsheet row.

/// A single input row keyed by header name.
///
/// Field order follows the source header. Lookups for absent fields yield an
/// empty string; when a header repeats, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Build a record by pairing headers with cell values.
    ///
    /// Missing trailing cells become empty strings and surplus cells are
    /// dropped, so the record always has exactly one value per header.
    pub fn from_row(headers: &[String], values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        let fields = headers
            .iter()
            .map(|header| (header.clone(), values.next().unwrap_or_default()))
            .collect();
        Self { fields }
    }

    /// Value of `name`, or `""` when the field is absent.
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Values for each alias, in alias order.
    pub fn values_for<'a, S: AsRef<str>>(&'a self, aliases: &[S]) -> Vec<&'a str> {
        aliases.iter().map(|alias| self.get(alias.as_ref())).collect()
    }

    /// First non-blank value among the aliases, or `""`.
    pub fn first_non_empty<S: AsRef<str>>(&self, aliases: &[S]) -> &str {
        aliases
            .iter()
            .map(|alias| self.get(alias.as_ref()))
            .find(|value| !value.trim().is_empty())
            .unwrap_or("")
    }
}
