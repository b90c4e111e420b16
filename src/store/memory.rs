use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{EmployeeStore, PayslipStore, StoreError};
use crate::model::{
    employee::{Employee, EmployeeCode},
    line_item::LineItem,
    payslip::Payslip,
};

/// Payslips kept in insertion order, which is also creation order.
#[derive(Default)]
pub struct MemoryPayslipStore {
    payslips: RwLock<Vec<Payslip>>,
}

impl MemoryPayslipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_of(payslip: &Payslip) -> StoreError {
    StoreError::Duplicate {
        employee_id: payslip.employee_id.to_string(),
        month: payslip.month.clone(),
        year: payslip.year.clone(),
    }
}

#[async_trait]
impl PayslipStore for MemoryPayslipStore {
    async fn insert(&self, payslip: Payslip) -> Result<Payslip, StoreError> {
        let mut payslips = self.payslips.write().await;

        if payslips
            .iter()
            .any(|p| p.matches_period(&payslip.employee_id, &payslip.month, &payslip.year))
        {
            return Err(duplicate_of(&payslip));
        }

        payslips.push(payslip.clone());
        Ok(payslip)
    }

    async fn update(&self, mut payslip: Payslip, expected_version: Option<u32>) -> Result<Payslip, StoreError> {
        let mut payslips = self.payslips.write().await;

        let index = payslips
            .iter()
            .position(|p| p.id == payslip.id)
            .ok_or(StoreError::NotFound)?;

        let current = payslips[index].version;
        if expected_version.is_some_and(|expected| expected != current) {
            return Err(StoreError::VersionMismatch { current });
        }

        if payslips.iter().any(|p| {
            p.id != payslip.id && p.matches_period(&payslip.employee_id, &payslip.month, &payslip.year)
        }) {
            return Err(duplicate_of(&payslip));
        }

        payslip.version = current + 1;
        payslip.updated_at = Utc::now();
        payslips[index] = payslip.clone();
        Ok(payslip)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payslip>, StoreError> {
        Ok(self.payslips.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_period(
        &self,
        employee_id: &EmployeeCode,
        month: &str,
        year: &str,
    ) -> Result<Option<Payslip>, StoreError> {
        Ok(self
            .payslips
            .read()
            .await
            .iter()
            .find(|p| p.matches_period(employee_id, month, year))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Payslip>, StoreError> {
        Ok(self.payslips.read().await.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut payslips = self.payslips.write().await;
        let before = payslips.len();
        payslips.retain(|p| p.id != id);
        Ok(payslips.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryEmployeeStore {
    employees: RwLock<HashMap<EmployeeCode, Employee>>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        Self {
            employees: RwLock::new(
                employees
                    .into_iter()
                    .map(|e| (e.employee_id.clone(), e))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn find_by_code(&self, code: &EmployeeCode) -> Result<Option<Employee>, StoreError> {
        Ok(self.employees.read().await.get(code).cloned())
    }

    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let mut employees: Vec<_> = self.employees.read().await.values().cloned().collect();
        employees.sort_by(|a, b| a.employee_id.as_str().cmp(b.employee_id.as_str()));
        Ok(employees)
    }

    async fn replace_defaults(
        &self,
        code: &EmployeeCode,
        earnings: &[LineItem],
        deductions: &[LineItem],
    ) -> Result<(), StoreError> {
        let mut employees = self.employees.write().await;
        let employee = employees.get_mut(code).ok_or(StoreError::NotFound)?;
        employee.earnings = earnings.to_vec();
        employee.deductions = deductions.to_vec();
        Ok(())
    }
}

/// Reads a JSON array of employee profiles for the in-memory backend.
pub fn load_seed(path: &Path) -> anyhow::Result<Vec<Employee>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read employee seed file {}", path.display()))?;

    serde_json::from_str(&raw).with_context(|| format!("Invalid employee seed file {}", path.display()))
}
