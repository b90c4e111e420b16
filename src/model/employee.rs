use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::line_item::LineItem;

/// Employee code as stored: trimmed and uppercased, so lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "EMP001")]
pub struct EmployeeCode(String);

impl EmployeeCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.is_empty() {
            None
        } else {
            Some(Self(code.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmployeeCode {
    type Error = &'static str;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or("employee code must not be blank")
    }
}

impl From<EmployeeCode> for String {
    fn from(code: EmployeeCode) -> Self {
        code.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    #[schema(example = "+8801712345678", nullable = true)]
    pub mobile: Option<String>,

    #[schema(example = "john.doe@company.com", nullable = true)]
    pub email: Option<String>,
}

/// The slice of the employee profile this service reads, plus the default
/// pay structure it keeps in sync with the latest payslip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "employeeID": "EMP001",
        "salutation": "Mr.",
        "firstName": "John",
        "lastName": "Doe",
        "earnings": [{"headName": "Basic", "type": "FIXED", "amount": 20000.0}],
        "deductions": [{"headName": "PF", "type": "FIXED", "amount": 1800.0}],
        "permanentAddress": {"mobile": "+8801712345678", "email": "john.doe@company.com"}
    })
)]
pub struct Employee {
    #[serde(rename = "employeeID")]
    pub employee_id: EmployeeCode,

    #[serde(default)]
    pub salutation: Option<String>,

    pub first_name: String,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub earnings: Vec<LineItem>,

    #[serde(default)]
    pub deductions: Vec<LineItem>,

    #[serde(default)]
    pub permanent_address: Address,
}

impl Employee {
    /// Salutation, first and last name, skipping blanks.
    pub fn full_name(&self) -> String {
        [
            self.salutation.as_deref(),
            Some(self.first_name.as_str()),
            self.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_is_uppercased() {
        let code = EmployeeCode::parse("  emp001 ").unwrap();
        assert_eq!(code.as_str(), "EMP001");
        assert_eq!(code.to_string(), "EMP001");
        assert!(EmployeeCode::parse("   ").is_none());
    }

    #[test]
    fn test_code_is_normalized_on_deserialize() {
        let code: EmployeeCode = serde_json::from_str("\"emp042\"").unwrap();
        assert_eq!(code.as_str(), "EMP042");
        assert!(serde_json::from_str::<EmployeeCode>("\"\"").is_err());
    }

    #[test]
    fn test_full_name_skips_missing_parts() {
        let mut employee: Employee = serde_json::from_value(serde_json::json!({
            "employeeID": "EMP001",
            "salutation": "Ms.",
            "firstName": "Jane",
            "lastName": "Doe"
        }))
        .unwrap();
        assert_eq!(employee.full_name(), "Ms. Jane Doe");

        employee.salutation = Some(String::new());
        employee.last_name = None;
        assert_eq!(employee.full_name(), "Jane");
    }
}
