//! Record module - extracted field values and their display form

/// Literal a model answers with when a field is not found in the document
pub const NULL_SENTINEL: &str = "null";

/// Display value substituted for empty or "null" extractions
pub const NOT_AVAILABLE: &str = "N/A";

/// Raw field → value map produced by the model calls
///
/// Keeps insertion order, which is the order the fields were extracted in.
/// Inserting an existing field replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionRecord {
    entries: Vec<(String, String)>,
}

impl ExtractionRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field value, returning the previous value if there was one
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let field = field.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((field, value));
                None
            }
        }
    }

    /// Get the value extracted for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over (field, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ExtractionRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ExtractionRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Defaulted field → display value map consumed by template rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    entries: Vec<(String, String)>,
}

impl RenderContext {
    /// Build the display context for a record.
    ///
    /// Empty values and values equal to "null" (any case) become
    /// [`NOT_AVAILABLE`]; everything else passes through unchanged.
    pub fn from_record(record: &ExtractionRecord) -> Self {
        let entries = record
            .iter()
            .map(|(field, value)| (field.to_string(), display_value(value).to_string()))
            .collect();

        Self { entries }
    }

    /// Get the display value for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over (field, display value) pairs in record order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context has no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Apply the defaulting rule to a single extracted value
pub fn display_value(value: &str) -> &str {
    if value.is_empty() || value.eq_ignore_ascii_case(NULL_SENTINEL) {
        NOT_AVAILABLE
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut record = ExtractionRecord::new();
        record.insert("title", "A study");
        record.insert("phase", "Phase I");
        record.insert("bmi", "null");

        let fields: Vec<_> = record.fields().collect();
        assert_eq!(fields, vec!["title", "phase", "bmi"]);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = ExtractionRecord::new();
        record.insert("a", "1");
        record.insert("b", "2");
        let previous = record.insert("a", "3");

        assert_eq!(previous.as_deref(), Some("1"));
        assert_eq!(record.get("a"), Some("3"));
        assert_eq!(record.fields().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_render_context_defaults() {
        let record: ExtractionRecord = [("phase", "Phase I"), ("bmi", "null"), ("title", "")]
            .into_iter()
            .collect();

        let context = RenderContext::from_record(&record);
        assert_eq!(context.get("phase"), Some("Phase I"));
        assert_eq!(context.get("bmi"), Some("N/A"));
        assert_eq!(context.get("title"), Some("N/A"));
        assert_eq!(context.len(), 3);
    }

    #[test]
    fn test_null_is_case_insensitive() {
        assert_eq!(display_value("NULL"), NOT_AVAILABLE);
        assert_eq!(display_value("Null"), NOT_AVAILABLE);
        // Only the exact sentinel is replaced
        assert_eq!(display_value("null value"), "null value");
        assert_eq!(display_value(" "), " ");
    }

    proptest! {
        #[test]
        fn prop_defaulting_law(value in ".*") {
            let record: ExtractionRecord = [("field", value.clone())].into_iter().collect();
            let context = RenderContext::from_record(&record);
            let shown = context.get("field").unwrap();

            if value.is_empty() || value.to_lowercase() == "null" {
                prop_assert_eq!(shown, "N/A");
            } else {
                prop_assert_eq!(shown, value.as_str());
            }
        }
    }
}
