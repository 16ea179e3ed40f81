//! JSON envelope decoding.
//!
//! Every endpoint body goes through [`decode`]. Unknown fields are ignored so
//! additions on the server side do not break older clients.

use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};

use crate::error::Result;

/// Parse `body` as JSON into `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Deserialize an integer given either as a JSON number or as a string of
/// digits. Story timestamps arrive in both forms depending on the endpoint.
pub fn int_or_string<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntOrString;

    impl<'de> Visitor<'de> for IntOrString {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<i64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(IntOrString)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::error::Error;

    #[derive(Debug, Deserialize)]
    struct Stamp {
        #[serde(deserialize_with = "int_or_string")]
        ts: i64,
    }

    #[test]
    fn accepts_number() {
        let s: Stamp = decode(br#"{"ts": 1700000000}"#).unwrap();
        assert_eq!(s.ts, 1_700_000_000);
    }

    #[test]
    fn accepts_numeric_string() {
        let s: Stamp = decode(br#"{"ts": "1700000000"}"#).unwrap();
        assert_eq!(s.ts, 1_700_000_000);
    }

    #[test]
    fn rejects_non_numeric_string() {
        let err = decode::<Stamp>(br#"{"ts": "yesterday"}"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn rejects_float() {
        let err = decode::<Stamp>(br#"{"ts": 1.5}"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn truncated_json_is_decode_error() {
        let err = decode::<serde_json::Value>(br#"{"result":"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn empty_body_is_decode_error() {
        let err = decode::<serde_json::Value>(b"").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
