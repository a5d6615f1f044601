//! Domain entities: flat input records and their variants

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{DomainError, DomainResult};

/// Field carrying the dot path in `id`-style records.
pub const ID_FIELD: &str = "id";
/// Field carrying the dot path in population records.
pub const POPULATION_ID_FIELD: &str = "ID";
/// Population value field of population records.
pub const POPULATION_VALUE_FIELD: &str = "POBL_2022";
/// Longest accepted dot path, in segments.
///
/// Trees are walked recursively when serialized, displayed and dropped, so
/// deeper paths are rejected up front.
pub const MAX_PATH_DEPTH: usize = 256;

/// Normalization variant applied to a whole batch of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordVariant {
    /// `{ id, value?, size? }`: value falls back to size
    Id,
    /// `{ ID, POBL_2022 }`
    Population,
}

impl RecordVariant {
    /// Name of the field holding the dot path.
    pub fn path_field(self) -> &'static str {
        match self {
            RecordVariant::Id => ID_FIELD,
            RecordVariant::Population => POPULATION_ID_FIELD,
        }
    }

    /// Select the variant from the leading record only.
    ///
    /// `id` wins when it is set and `ID` is not; otherwise a set `ID` selects
    /// the population variant. "Set" follows JSON truthiness: null, false, 0
    /// and "" count as unset.
    pub fn sniff(first: &Value) -> Option<Self> {
        let obj = first.as_object()?;
        let has_id = obj.get(ID_FIELD).is_some_and(is_truthy);
        let has_population_id = obj.get(POPULATION_ID_FIELD).is_some_and(is_truthy);

        if has_id && !has_population_id {
            Some(RecordVariant::Id)
        } else if has_population_id {
            Some(RecordVariant::Population)
        } else {
            None
        }
    }
}

impl fmt::Display for RecordVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordVariant::Id => write!(f, "id"),
            RecordVariant::Population => write!(f, "population"),
        }
    }
}

/// How the builder picks a variant: sniffed from the first record, or forced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatHint {
    #[default]
    Auto,
    Id,
    Population,
}

impl FormatHint {
    /// Forced variant, None for `Auto`.
    pub fn forced(self) -> Option<RecordVariant> {
        match self {
            FormatHint::Auto => None,
            FormatHint::Id => Some(RecordVariant::Id),
            FormatHint::Population => Some(RecordVariant::Population),
        }
    }
}

impl fmt::Display for FormatHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatHint::Auto => write!(f, "auto"),
            FormatHint::Id => write!(f, "id"),
            FormatHint::Population => write!(f, "population"),
        }
    }
}

impl FromStr for FormatHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(FormatHint::Auto),
            "id" => Ok(FormatHint::Id),
            "population" | "pobl" => Ok(FormatHint::Population),
            other => Err(format!(
                "unknown format '{other}' (expected auto, id or population)"
            )),
        }
    }
}

/// One flat input row after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    /// Dot-delimited path, never empty
    pub path: String,
    /// Value attached to the node the path terminates at
    pub value: Option<f64>,
}

impl FlatRecord {
    pub fn new(path: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }

    /// Convert a JSON row using the batch's variant.
    ///
    /// Rejects rows that are not objects, lack a string path in the
    /// variant's field, have more than [`MAX_PATH_DEPTH`] segments, or carry
    /// a value that is not a finite number.
    pub fn from_json(index: usize, row: &Value, variant: RecordVariant) -> DomainResult<Self> {
        let obj = row
            .as_object()
            .ok_or_else(|| DomainError::invalid(index, format!("expected object, got {}", kind_of(row))))?;

        let field = variant.path_field();
        let path = match obj.get(field) {
            Some(Value::String(s)) if s.is_empty() => return Err(DomainError::EmptyPath { index }),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(DomainError::invalid(
                    index,
                    format!("field '{field}' must be a string, got {}", kind_of(other)),
                ))
            }
            None => {
                return Err(DomainError::invalid(
                    index,
                    format!("missing '{field}' field for {variant} records"),
                ))
            }
        };

        let depth = path.split('.').count();
        if depth > MAX_PATH_DEPTH {
            return Err(DomainError::invalid(
                index,
                format!("path has {depth} segments, at most {MAX_PATH_DEPTH} allowed"),
            ));
        }

        let value = match variant {
            // falsy value (0, "", null, false) falls back to size
            RecordVariant::Id if obj.get("value").is_some_and(is_truthy) => {
                numeric_field(index, obj, "value")?
            }
            RecordVariant::Id => numeric_field(index, obj, "size")?,
            RecordVariant::Population => numeric_field(index, obj, POPULATION_VALUE_FIELD)?,
        };

        Ok(Self { path, value })
    }

    /// Path segments in order. Splitting is literal, so `a..b` yields an empty segment.
    pub fn segments(&self) -> std::str::Split<'_, char> {
        self.path.split('.')
    }
}

/// Finite numbers and numeric strings are accepted; null or absent means no value.
fn numeric_field(index: usize, obj: &Map<String, Value>, field: &str) -> DomainResult<Option<f64>> {
    let parsed = match obj.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => {
            return Err(DomainError::invalid(
                index,
                format!("field '{field}' must be a number, got {}", kind_of(other)),
            ))
        }
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(DomainError::invalid(
            index,
            format!("field '{field}' is not a finite number: {}", obj[field]),
        )),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
