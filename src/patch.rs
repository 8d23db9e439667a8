//! Partial-update request bodies.
//!
//! Fields declared `Option<Option<T>>` with
//! `#[serde(default, deserialize_with = "crate::patch::nullable")]` read as:
//! absent → `None` (keep), `null` → `Some(None)` (clear), value → `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

pub fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Borrowed view of a patch field.
pub fn as_deref(field: &Option<Option<String>>) -> Option<Option<&str>> {
    field.as_ref().map(|v| v.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.note, None);

        let cleared: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(cleared.note, Some(None));

        let set: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(set.note, Some(Some("hi".to_string())));
        assert_eq!(as_deref(&set.note), Some(Some("hi")));
    }
}
