//! Dataset types shared by the ledger, the remote store and the export surface
//!
//! Field names follow the camelCase JSON used by the bundled dataset and the
//! spreadsheet-backed remote store. Numeric fields written by the spreadsheet
//! sometimes arrive as strings, so the deserializers here accept both.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DataError;

/// Point values. The remote store is a spreadsheet, so fractional values are legal.
pub type Points = f64;

/// Identifier assigned by the remote store to a persisted transaction
pub type TransactionId = String;

/// Reason recorded when an adjustment is submitted without one
pub const DEFAULT_REASON: &str = "Adjustment";

/// A team of students competing on the group leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    /// Cohort tag, usually the class period
    #[serde(default, deserialize_with = "lenient::string")]
    pub hour: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motto: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub group_id: String,
    /// Opaque lookup credential, compared case-insensitively
    #[serde(deserialize_with = "lenient::string")]
    pub code: String,
    /// Display-only
    #[serde(default)]
    pub level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default)]
    pub powerups: Vec<String>,
}

/// One append-only point change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "lenient::string")]
    pub id: TransactionId,
    pub student_id: String,
    pub group_id: String,
    #[serde(deserialize_with = "lenient::number")]
    pub delta: Points,
    #[serde(default = "default_reason", deserialize_with = "lenient::reason")]
    pub reason: String,
    /// Calendar date, `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: String,
}

/// An unlockable reward gated on a point threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTier {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub threshold: Points,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Catalogue entry for the power-ups a student may hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub id: String,
    pub label: String,
}

/// The bundled dataset a session is loaded from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub groups: Vec<Group>,
    pub students: Vec<Student>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub pets: Vec<RewardTier>,
    #[serde(default)]
    pub powerups: Vec<Powerup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_passcode: Option<String>,
}

impl Dataset {
    /// Parse a dataset from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dataset file.
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

fn default_reason() -> String {
    DEFAULT_REASON.to_string()
}

/// Trim a reason, falling back to [`DEFAULT_REASON`] when nothing is left.
pub fn normalize_reason(reason: &str) -> String {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        default_reason()
    } else {
        trimmed.to_string()
    }
}

/// Reduce a spreadsheet date or timestamp to its `YYYY-MM-DD` prefix.
///
/// Values without a parseable date prefix are kept as given.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    match raw.get(..10) {
        Some(prefix) if chrono::NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok() => {
            prefix.to_string()
        }
        _ => raw.to_string(),
    }
}

mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Scalar::Text(s) => s,
                Scalar::Int(i) => i.to_string(),
                Scalar::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    (f as i64).to_string()
                }
                Scalar::Float(f) => f.to_string(),
                Scalar::Null(()) => String::new(),
            }
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Scalar::deserialize(d)?.into_string())
    }

    /// Finite numbers only; "NaN" and "inf" strings are rejected like any other text.
    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = match Scalar::deserialize(d)? {
            Scalar::Int(i) => i as f64,
            Scalar::Float(f) => f,
            Scalar::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got '{s}'")))?,
            Scalar::Null(()) => return Err(serde::de::Error::custom("expected a number, got null")),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected a finite number, got {value}"
            )))
        }
    }

    pub fn reason<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(normalize_reason(&string(d)?))
    }

    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(normalize_date(&string(d)?))
    }
}
