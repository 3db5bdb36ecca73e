//! Lenient numeric deserializers.
//!
//! Browser forms post numeric inputs as strings (`"12000"`). These helpers accept
//! either a JSON number or a numeric string; an empty string reads as zero / `None`.

use serde::de::{Deserializer, Error};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Float {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Integer {
    Number(i64),
    Text(String),
}

pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Float::deserialize(deserializer)? {
        Float::Number(n) => Ok(n),
        Float::Text(s) if s.trim().is_empty() => Ok(0.0),
        Float::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected a number, got {:?}", s))),
    }
}

pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<Float>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Float::Number(n)) => Ok(Some(n)),
        Some(Float::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Float::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, got {:?}", s))),
    }
}

pub fn i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Integer::deserialize(deserializer)? {
        Integer::Number(n) => Ok(n),
        Integer::Text(s) if s.trim().is_empty() => Ok(0),
        Integer::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected an integer, got {:?}", s))),
    }
}
