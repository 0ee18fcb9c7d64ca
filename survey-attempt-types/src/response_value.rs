use serde::{Deserialize, Serialize};

/// The raw value of a single answer.
///
/// This is the value stored in `Responses` for each answered question. The
/// hosted backend keeps it as a loosely typed column, so it serializes untagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// A yes/no answer.
    Bool(bool),

    /// An integer answer (scale questions, option-backed answers).
    Int(i64),

    /// A floating-point answer.
    Float(f64),

    /// A free-text answer, or the display text of a chosen option.
    String(String),
}

impl ResponseValue {
    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::String(_) => "String",
        }
    }
}

impl From<String> for ResponseValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for ResponseValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for ResponseValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for ResponseValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for ResponseValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ResponseValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_json_keeps_the_natural_type() {
        let parsed: Vec<ResponseValue> = serde_json::from_str(r#"[4, 2.5, "often", true]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                ResponseValue::Int(4),
                ResponseValue::Float(2.5),
                ResponseValue::from("often"),
                ResponseValue::Bool(true),
            ]
        );
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(ResponseValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ResponseValue::from("3").as_float(), None);
    }
}
