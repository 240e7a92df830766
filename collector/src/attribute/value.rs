use std::collections::BTreeMap;

/// A value read from the attribute tree.
///
/// Numeric leaves are read as double precision. Structured attributes expose
/// named sub-fields, so one query can return e.g. the `used`, `max`, and
/// `committed` components of a memory pool in a single round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Composite(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Build a composite value from numeric sub-fields.
    pub fn composite<'a>(fields: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self::Composite(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), Self::Number(value)))
                .collect(),
        )
    }

    /// The numeric reading of this value, `None` for composites.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Composite(_) => None,
        }
    }

    /// Look up a named sub-field of a composite value.
    pub fn field(&self, name: &str) -> Option<&AttributeValue> {
        match self {
            Self::Composite(fields) => fields.get(name),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_leaf_reads_as_f64() {
        let value = AttributeValue::from(42i64);
        assert_eq!(value.as_f64(), Some(42.0));
        assert!(value.field("used").is_none());
    }

    #[test]
    fn composite_exposes_subfields() {
        let value = AttributeValue::composite([("used", 512.0), ("max", 4096.0)]);
        assert!(value.as_f64().is_none());
        assert_eq!(value.field("used").and_then(AttributeValue::as_f64), Some(512.0));
        assert!(value.field("committed").is_none());
    }
}
