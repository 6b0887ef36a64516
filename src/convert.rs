//! Serialization collaborators.
//!
//! `stringify` produces the canonical wire form of a request body;
//! `clone` deep-copies a value by a serialize/deserialize round trip.
//! Both raise [`ConvertError`] for values that cannot be represented as
//! JSON; neither wraps its failure in a dispatch result.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ConvertError;

/// Serialize a value to compact JSON text.
pub fn stringify<T>(value: &T) -> Result<String, ConvertError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(ConvertError::from)
}

/// Deep copy via a serialize/deserialize round trip.
///
/// Only data that survives JSON survives the copy: fields serde skips are
/// silently dropped rather than raising. A value that cannot serialize at
/// all is a typed error.
pub fn clone<T>(value: &T) -> Result<T, ConvertError>
where
    T: Serialize + DeserializeOwned,
{
    let text = stringify(value)?;
    serde_json::from_str(&text).map_err(ConvertError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::{Deserialize, Serializer};
    use serde_json::json;

    struct NotRepresentable;

    impl Serialize for NotRepresentable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot stringify this value"))
        }
    }

    #[test]
    fn stringify_produces_canonical_compact_json() {
        let text = stringify(&json!({ "test": "" })).unwrap();
        assert_eq!(text, r#"{"test":""}"#);
    }

    #[test]
    fn stringify_rejects_non_representable_values() {
        let err = stringify(&NotRepresentable).unwrap_err();
        assert!(err.to_string().contains("cannot stringify this value"));
    }

    #[test]
    fn clone_copies_a_full_object() {
        let value = json!({ "test": "test-val", "testArr": [0, 1, 2] });
        assert_eq!(clone(&value).unwrap(), value);
    }

    #[test]
    fn clone_copies_an_array() {
        assert_eq!(clone(&vec![0, 1, 2]).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn clone_drops_fields_serde_skips() {
        #[derive(Serialize, Deserialize, Default)]
        struct Partial {
            test: String,
            #[serde(skip, default)]
            scratch: u32,
        }

        let copied = clone(&Partial {
            test: "test-val".into(),
            scratch: 7,
        })
        .unwrap();
        assert_eq!(copied.test, "test-val");
        assert_eq!(copied.scratch, 0);
    }
}
