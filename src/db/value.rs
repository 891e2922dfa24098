//! Backend-neutral cell values.
//!
//! Query results are converted into `CellValue` at the backend boundary so
//! the projector and the output layer never see engine-specific types.

use serde::{Serialize, Serializer};

/// A single result cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    #[serde(serialize_with = "serialize_hex")]
    Bytes(Vec<u8>),
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

impl CellValue {
    /// Extract as String if the value is text.
    pub fn as_string(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Extract as i64 if the value is numeric (floats are truncated).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Text shown in a rendered table cell. Nulls render as an empty string.
    pub fn render(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bytes(b) => format!("\\x{}", hex::encode(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_as_string_from_text() {
        let value = CellValue::Text("hello".into());
        assert_eq!(value.as_string(), Some("hello".to_string()));
    }

    #[rstest]
    fn test_as_string_from_non_text() {
        assert_eq!(CellValue::Int(42).as_string(), None);
    }

    #[rstest]
    fn test_as_i64_from_float_truncates() {
        assert_eq!(CellValue::Float(42.7).as_i64(), Some(42));
    }

    #[rstest]
    #[case(CellValue::Null, "")]
    #[case(CellValue::Bool(true), "true")]
    #[case(CellValue::Int(-7), "-7")]
    #[case(CellValue::Float(1.5), "1.5")]
    #[case(CellValue::Text("Alice".into()), "Alice")]
    #[case(CellValue::Bytes(vec![0xde, 0xad]), "\\xdead")]
    fn test_render(#[case] value: CellValue, #[case] expected: &str) {
        assert_eq!(value.render(), expected);
    }

    #[rstest]
    fn test_serialize_null_and_bytes() {
        let cells = vec![CellValue::Null, CellValue::Bytes(vec![1, 255])];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[null,"01ff"]"#);
    }
}
