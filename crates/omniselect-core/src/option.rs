use serde::{Deserialize, Serialize};

/// Ready-made option type for sources that deliver `{label, value}` records.
///
/// The load path is generic over its option type and never looks inside;
/// this exists for the file and HTTP sources and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose value is its label.
    pub fn labelled(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: serde_json::Value::String(label.clone()),
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_value() {
        let opt: SelectOption = serde_json::from_str(r#"{"label": "Oslo"}"#).unwrap();
        assert_eq!(opt.label, "Oslo");
        assert!(opt.value.is_null());
    }

    #[test]
    fn test_labelled() {
        let opt = SelectOption::labelled("Lisbon");
        assert_eq!(opt.value, serde_json::json!("Lisbon"));
    }
}
