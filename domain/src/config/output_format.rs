//! Output format value object

use serde::{Deserialize, Serialize};

/// How a resolution is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Answer followed by the full consensus history
    Full,
    /// Only the final answer (default)
    #[default]
    Answer,
    /// JSON object with answer, outcome and history
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_answer() {
        assert_eq!(OutputFormat::default(), OutputFormat::Answer);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Full).unwrap();
        assert_eq!(json, "\"full\"");
    }

    #[test]
    fn test_deserialize_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
