use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::employee::EmployeeCode;
use super::line_item::{LineItem, RawLineItem, coerce_amount};

/// Attendance counters for the pay period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayDetails {
    #[schema(example = 31.0)]
    pub month_days: f64,

    #[schema(example = 26.0)]
    pub total_working_days: f64,

    #[serde(rename = "LOP")]
    #[schema(example = 2.0)]
    pub lop: f64,

    #[schema(example = 1.0)]
    pub leaves: f64,
}

/// Attendance block as submitted; every counter goes through the same
/// silent-zero coercion as line item amounts.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayDetailsInput {
    #[schema(value_type = f64, example = 31)]
    pub month_days: Option<Value>,

    #[schema(value_type = f64, example = 26)]
    pub total_working_days: Option<Value>,

    #[serde(rename = "LOP")]
    #[schema(value_type = f64, example = 2)]
    pub lop: Option<Value>,

    #[schema(value_type = f64, example = 1)]
    pub leaves: Option<Value>,
}

impl PayDetailsInput {
    pub fn normalize(&self) -> PayDetails {
        PayDetails {
            month_days: coerce_amount(self.month_days.as_ref()),
            total_working_days: coerce_amount(self.total_working_days.as_ref()),
            lop: coerce_amount(self.lop.as_ref()),
            leaves: coerce_amount(self.leaves.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "7f1c8e2a-52d4-4b8e-9d2c-2f6b1f3f4a10",
        "employeeId": "EMP001",
        "employeeName": "Mr. John Doe",
        "mobile": "+8801712345678",
        "email": "john.doe@company.com",
        "month": "March",
        "year": "2025",
        "earnings": [
            {"headName": "Basic", "type": "FIXED", "amount": 20000.0},
            {"headName": "HRA", "type": "FIXED", "amount": 5000.0}
        ],
        "deductions": [{"headName": "PF", "type": "FIXED", "amount": 1800.0}],
        "grossSalary": 25000.0,
        "totalDeduction": 1800.0,
        "netSalary": 23200.0,
        "lopAmount": 1612.9,
        "inHandSalary": 21587.1,
        "payDetails": {"monthDays": 31.0, "totalWorkingDays": 26.0, "LOP": 2.0, "leaves": 0.0},
        "version": 1,
        "createdAt": "2025-04-01T09:00:00Z",
        "updatedAt": "2025-04-01T09:00:00Z"
    })
)]
pub struct Payslip {
    pub id: String,
    pub employee_id: EmployeeCode,
    pub employee_name: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub month: String,
    pub year: String,
    pub earnings: Vec<LineItem>,
    pub deductions: Vec<LineItem>,
    pub gross_salary: f64,
    pub total_deduction: f64,
    pub net_salary: f64,
    pub lop_amount: f64,
    pub in_hand_salary: f64,
    pub pay_details: Option<PayDetails>,
    pub version: u32,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl Payslip {
    pub fn matches_period(&self, employee_id: &EmployeeCode, month: &str, year: &str) -> bool {
        &self.employee_id == employee_id && self.month == month && self.year == year
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayslip {
    #[schema(example = "emp001")]
    pub employee_id: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    #[schema(example = "March")]
    pub month: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    #[schema(example = "2025")]
    pub year: Option<String>,

    /// Omitted lists fall back to the employee's stored defaults.
    pub earnings: Option<Vec<RawLineItem>>,

    pub deductions: Option<Vec<RawLineItem>>,

    pub pay_details: Option<PayDetailsInput>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayslip {
    #[serde(default, deserialize_with = "text_or_number")]
    #[schema(example = "March")]
    pub month: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    #[schema(example = "2025")]
    pub year: Option<String>,

    #[serde(default)]
    pub earnings: Vec<RawLineItem>,

    #[serde(default)]
    pub deductions: Vec<RawLineItem>,

    pub pay_details: Option<PayDetailsInput>,

    /// When set, the update is rejected unless the stored version matches.
    #[schema(example = 1)]
    pub expected_version: Option<u32>,
}

/// Period fields arrive as strings from the form but numeric years are
/// common from other clients.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "March")]
    pub month: String,

    #[schema(example = "2025")]
    pub year: String,
}
