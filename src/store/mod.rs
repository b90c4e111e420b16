use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    employee::{Employee, EmployeeCode},
    line_item::LineItem,
    payslip::Payslip,
};

pub mod memory;
pub mod mysql;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("A payslip for {employee_id} {month} {year} already exists")]
    Duplicate {
        employee_id: String,
        month: String,
        year: String,
    },

    #[error("Record was modified concurrently (stored version {current})")]
    VersionMismatch { current: u32 },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Payslip persistence. `(employee_id, month, year)` is unique: inserts and
/// period-changing updates that collide fail with [`StoreError::Duplicate`].
#[async_trait]
pub trait PayslipStore: Send + Sync {
    async fn insert(&self, payslip: Payslip) -> Result<Payslip, StoreError>;

    /// Full replace of the mutable fields. The store bumps `version`; when
    /// `expected_version` is set the write only happens if it still matches.
    async fn update(&self, payslip: Payslip, expected_version: Option<u32>) -> Result<Payslip, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Payslip>, StoreError>;

    /// Earliest created match for the period.
    async fn find_by_period(
        &self,
        employee_id: &EmployeeCode,
        month: &str,
        year: &str,
    ) -> Result<Option<Payslip>, StoreError>;

    /// Oldest first.
    async fn list(&self) -> Result<Vec<Payslip>, StoreError>;

    /// `false` when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_by_code(&self, code: &EmployeeCode) -> Result<Option<Employee>, StoreError>;

    async fn list(&self) -> Result<Vec<Employee>, StoreError>;

    /// Overwrites the employee's default pay structure.
    async fn replace_defaults(
        &self,
        code: &EmployeeCode,
        earnings: &[LineItem],
        deductions: &[LineItem],
    ) -> Result<(), StoreError>;
}
