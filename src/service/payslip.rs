use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    calculator::{PayrollSummary, summarize},
    error::PayslipError,
    profile_sync::ProfileSync,
};
use crate::{
    model::{
        employee::{Employee, EmployeeCode},
        line_item::{LineItem, RawLineItem, normalize_all},
        payslip::{CreatePayslip, PayDetails, PayDetailsInput, Payslip, PeriodQuery, UpdatePayslip},
    },
    store::PayslipStore,
    utils::{
        calendar::{Month, days_in_month},
        employee_cache::EmployeeCache,
    },
};

pub struct PayslipService {
    payslips: Arc<dyn PayslipStore>,
    employees: Arc<EmployeeCache>,
    sync: Arc<dyn ProfileSync>,
}

/// Known month names are stored in their canonical spelling so
/// "march" and "March" share a period key.
fn canonical_month(raw: &str) -> String {
    let raw = raw.trim();
    raw.parse::<Month>().map(|m| m.to_string()).unwrap_or_else(|_| raw.to_string())
}

fn require_period(month: Option<&str>, year: Option<&str>) -> Result<(String, String), PayslipError> {
    let month = month.map(canonical_month).filter(|m| !m.is_empty());
    let year = year.map(str::trim).filter(|y| !y.is_empty());

    match (month, year) {
        (Some(month), Some(year)) => Ok((month, year.to_string())),
        _ => Err(PayslipError::Validation("Please select month & year".to_string())),
    }
}

/// Fills in `monthDays` from the calendar when the form left it empty.
fn resolve_pay_details(input: Option<&PayDetailsInput>, month: &str, year: &str) -> Option<PayDetails> {
    input.map(|input| {
        let mut details = input.normalize();
        if details.month_days <= 0.0 {
            details.month_days = days_in_month(month, year).map_or(0.0, f64::from);
        }
        details
    })
}

fn figures(earnings: &[LineItem], deductions: &[LineItem], details: Option<&PayDetails>) -> PayrollSummary {
    let (month_days, lop_days) = details.map_or((0.0, 0.0), |d| (d.month_days, d.lop));
    summarize(earnings, deductions, month_days, lop_days).rounded()
}

fn apply_figures(payslip: &mut Payslip, summary: PayrollSummary) {
    payslip.gross_salary = summary.gross_salary;
    payslip.total_deduction = summary.total_deduction;
    payslip.net_salary = summary.net_salary;
    payslip.lop_amount = summary.lop_amount;
    payslip.in_hand_salary = summary.in_hand_salary;
}

fn defaults_as_rows(items: &[LineItem]) -> Vec<RawLineItem> {
    items.iter().cloned().map(RawLineItem::from).collect()
}

impl PayslipService {
    pub fn new(payslips: Arc<dyn PayslipStore>, employees: Arc<EmployeeCache>, sync: Arc<dyn ProfileSync>) -> Self {
        Self {
            payslips,
            employees,
            sync,
        }
    }

    async fn resolve_employee(&self, raw_code: &str) -> Result<Employee, PayslipError> {
        let code = EmployeeCode::parse(raw_code)
            .ok_or_else(|| PayslipError::Validation("employeeId is required".to_string()))?;

        self.employees
            .find(&code)
            .await?
            .ok_or_else(|| PayslipError::not_found("Employee"))
    }

    /// The payslip is the source of truth; a failed mirror write is only
    /// logged.
    async fn sync_profile(&self, payslip: &Payslip) {
        if let Err(e) = self
            .sync
            .sync_defaults(&payslip.employee_id, &payslip.earnings, &payslip.deductions)
            .await
        {
            warn!(
                error = %e,
                employee_id = %payslip.employee_id,
                payslip_id = %payslip.id,
                "Payslip saved but employee profile sync failed"
            );
        }
    }

    #[instrument(skip(self, request), fields(employee_id = ?request.employee_id))]
    pub async fn create(&self, request: CreatePayslip) -> Result<Payslip, PayslipError> {
        let raw_code = request
            .employee_id
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| PayslipError::Validation("employeeId is required".to_string()))?;

        // An unknown employee is reported before an incomplete period.
        let employee = self.resolve_employee(raw_code).await?;
        let (month, year) = require_period(request.month.as_deref(), request.year.as_deref())?;

        let earnings = normalize_all(
            &request
                .earnings
                .unwrap_or_else(|| defaults_as_rows(&employee.earnings)),
        );
        let deductions = normalize_all(
            &request
                .deductions
                .unwrap_or_else(|| defaults_as_rows(&employee.deductions)),
        );
        let pay_details = resolve_pay_details(request.pay_details.as_ref(), &month, &year);

        let now = Utc::now();
        let mut payslip = Payslip {
            id: Uuid::new_v4().to_string(),
            employee_name: employee.full_name(),
            employee_id: employee.employee_id,
            mobile: employee.permanent_address.mobile,
            email: employee.permanent_address.email,
            month,
            year,
            earnings,
            deductions,
            gross_salary: 0.0,
            total_deduction: 0.0,
            net_salary: 0.0,
            lop_amount: 0.0,
            in_hand_salary: 0.0,
            pay_details,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        let summary = figures(&payslip.earnings, &payslip.deductions, payslip.pay_details.as_ref());
        apply_figures(&mut payslip, summary);

        let payslip = self.payslips.insert(payslip).await?;
        info!(payslip_id = %payslip.id, month = %payslip.month, year = %payslip.year, "Payslip created");

        self.sync_profile(&payslip).await;
        Ok(payslip)
    }

    /// Full replace of line items, attendance and period. Employee snapshot
    /// fields keep the values captured at creation.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: &str, request: UpdatePayslip) -> Result<Payslip, PayslipError> {
        let (month, year) = require_period(request.month.as_deref(), request.year.as_deref())?;

        let mut payslip = self
            .payslips
            .find_by_id(id)
            .await?
            .ok_or_else(|| PayslipError::not_found("Payslip"))?;

        payslip.earnings = normalize_all(&request.earnings);
        payslip.deductions = normalize_all(&request.deductions);
        payslip.pay_details = resolve_pay_details(request.pay_details.as_ref(), &month, &year);
        payslip.month = month;
        payslip.year = year;
        let summary = figures(&payslip.earnings, &payslip.deductions, payslip.pay_details.as_ref());
        apply_figures(&mut payslip, summary);

        let payslip = self.payslips.update(payslip, request.expected_version).await?;
        info!(payslip_id = %payslip.id, version = payslip.version, "Payslip updated");

        self.sync_profile(&payslip).await;
        Ok(payslip)
    }

    pub async fn list(&self) -> Result<Vec<Payslip>, PayslipError> {
        Ok(self.payslips.list().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Payslip, PayslipError> {
        self.payslips
            .find_by_id(id)
            .await?
            .ok_or_else(|| PayslipError::not_found("Payslip"))
    }

    pub async fn find_by_period(&self, query: &PeriodQuery) -> Result<Option<Payslip>, PayslipError> {
        let code = EmployeeCode::parse(&query.employee_id)
            .ok_or_else(|| PayslipError::Validation("employeeId is required".to_string()))?;

        Ok(self
            .payslips
            .find_by_period(&code, &canonical_month(&query.month), query.year.trim())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), PayslipError> {
        if !self.payslips.delete(id).await? {
            return Err(PayslipError::not_found("Payslip"));
        }

        info!(payslip_id = %id, "Payslip deleted");
        Ok(())
    }

    pub async fn get_employee(&self, raw_code: &str) -> Result<Employee, PayslipError> {
        self.resolve_employee(raw_code).await
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, PayslipError> {
        Ok(self.employees.list().await?)
    }
}
