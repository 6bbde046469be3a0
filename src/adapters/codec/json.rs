use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Decodes a top-level JSON array into records, preserving order.
pub fn decode_records<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(text)?)
}

/// Two-space indented JSON array.
pub fn encode_pretty<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::JailError;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Item {
        name: String,
        count: i32,
    }

    #[test]
    fn test_decode_preserves_order() {
        let items: Vec<Item> =
            decode_records(r#"[{"Name":"b","Count":2},{"Name":"a","Count":1}]"#).unwrap();
        assert_eq!(items[0].name, "b");
        assert_eq!(items[1].name, "a");
    }

    #[test]
    fn test_decode_malformed_is_format_error() {
        let err = decode_records::<Item>("[{\"Name\":").unwrap_err();
        assert!(matches!(err, JailError::Json(_)));
    }

    #[test]
    fn test_encode_pretty_is_indented() {
        let text = encode_pretty(&[Item {
            name: "a".to_string(),
            count: 1,
        }])
        .unwrap();
        assert!(text.starts_with("[\n  {\n    \"Name\": \"a\""));
    }
}
