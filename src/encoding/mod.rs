pub mod keycode;
pub mod path;

use std::collections::BTreeSet;

use crate::config::DEFAULT_MAX_KEY_LENGTH;
use crate::tree::PropertyValue;

/// Trait for values that can be stored as index keys.
///
/// Every value is indexed through its string form. Keys compare as
/// strings after encoding, so numbers order lexicographically, not
/// numerically.
pub trait Key {
    /// The string form of the value before encoding
    fn key_string(&self) -> String;

    /// Encode the value to its canonical key with the default truncation
    fn encode_key(&self) -> String {
        keycode::encode_string(&self.key_string(), DEFAULT_MAX_KEY_LENGTH)
    }
}

impl Key for str {
    fn key_string(&self) -> String {
        self.to_string()
    }
}

impl Key for String {
    fn key_string(&self) -> String {
        self.clone()
    }
}

impl Key for i64 {
    fn key_string(&self) -> String {
        self.to_string()
    }
}

impl Key for bool {
    fn key_string(&self) -> String {
        self.to_string()
    }
}

impl Key for PropertyValue {
    fn key_string(&self) -> String {
        match self {
            PropertyValue::String(s) => s.clone(),
            PropertyValue::Boolean(b) => b.key_string(),
            PropertyValue::Long(n) => n.key_string(),
        }
    }
}

/// Encodes every value, collapsing duplicates.
pub fn encode_values<'a, K, I>(values: I, max_len: usize) -> BTreeSet<String>
where
    K: Key + ?Sized + 'a,
    I: IntoIterator<Item = &'a K>,
{
    values
        .into_iter()
        .map(|v| keycode::encode_string(&v.key_string(), max_len))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strings() {
        assert_eq!("a b".encode_key(), "a+b");
        assert_eq!(42i64.encode_key(), "42");
        assert_eq!((-7i64).encode_key(), "-7");
        assert_eq!(true.encode_key(), "true");
        assert_eq!(PropertyValue::Long(3).encode_key(), "3");
        assert_eq!(PropertyValue::from("x/y").encode_key(), "x%2Fy");
    }

    #[test]
    fn test_encode_values_dedupes() {
        let keys = encode_values(["b", "a", "b", ""], 100);
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec![":".to_string(), "a".to_string(), "b".to_string()]
        );
    }
}
