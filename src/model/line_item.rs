use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Whether a pay head is paid every cycle or varies month to month.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HeadType {
    #[default]
    Fixed,
    Variable,
}

/// One earning or deduction component of a payslip or employee profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"headName": "Basic", "type": "FIXED", "amount": 20000.0}))]
pub struct LineItem {
    pub head_name: String,

    #[serde(rename = "type", default)]
    pub head_type: HeadType,

    #[schema(example = 20000.0)]
    pub amount: f64,
}

impl LineItem {
    pub fn new(head_name: impl Into<String>, head_type: HeadType, amount: f64) -> Self {
        Self {
            head_name: head_name.into(),
            head_type,
            amount,
        }
    }
}

/// A line item as typed into the form: the type may be missing or
/// misspelled and the amount may be any JSON value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[schema(example = "Basic")]
    pub head_name: Option<String>,

    #[serde(rename = "type", alias = "headType")]
    #[schema(example = "FIXED")]
    pub head_type: Option<String>,

    #[serde(alias = "value")]
    #[schema(value_type = f64, example = 20000.0)]
    pub amount: Option<Value>,
}

impl From<LineItem> for RawLineItem {
    fn from(item: LineItem) -> Self {
        Self {
            head_name: Some(item.head_name),
            head_type: Some(item.head_type.to_string()),
            amount: serde_json::Number::from_f64(item.amount).map(Value::Number),
        }
    }
}

/// Numeric coercion with the silent-zero policy: anything that is not a
/// finite, non-negative number counts as 0.
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() { Some(0.0) } else { s.parse::<f64>().ok() }
        }
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

pub fn normalize(raw: &RawLineItem) -> LineItem {
    let head_type = raw
        .head_type
        .as_deref()
        .map(str::trim)
        .and_then(|t| t.parse::<HeadType>().ok())
        .unwrap_or_default();

    LineItem {
        head_name: raw.head_name.clone().unwrap_or_default(),
        head_type,
        amount: coerce_amount(raw.amount.as_ref()),
    }
}

pub fn normalize_all(rows: &[RawLineItem]) -> Vec<LineItem> {
    rows.iter().map(normalize).collect()
}
