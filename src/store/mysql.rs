use async_trait::async_trait;
use futures_util::StreamExt;
use sqlx::{MySqlPool, Row, mysql::MySqlRow, types::Json};
use tracing::debug;

use super::{EmployeeStore, PayslipStore, StoreError};
use crate::model::{
    employee::{Address, Employee, EmployeeCode},
    line_item::LineItem,
    payslip::{PayDetails, Payslip},
};

const PAYSLIP_COLUMNS: &str = r#"
    id, employee_id, employee_name, mobile, email, month, year,
    earnings, deductions, gross_salary, total_deduction, net_salary,
    lop_amount, in_hand_salary, pay_details, version, created_at, updated_at
"#;

/// MySQL reports unique key violations with SQLSTATE 23000.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000"))
}

fn get<'r, T>(row: &'r MySqlRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Database(format!("Failed to get {}: {}", column, e)))
}

fn row_to_payslip(row: &MySqlRow) -> Result<Payslip, StoreError> {
    let employee_id: String = get(row, "employee_id")?;
    let earnings: Json<Vec<LineItem>> = get(row, "earnings")?;
    let deductions: Json<Vec<LineItem>> = get(row, "deductions")?;
    let pay_details: Option<Json<PayDetails>> = get(row, "pay_details")?;

    Ok(Payslip {
        id: get(row, "id")?,
        employee_id: EmployeeCode::try_from(employee_id).map_err(|e| StoreError::Database(e.to_string()))?,
        employee_name: get(row, "employee_name")?,
        mobile: get(row, "mobile")?,
        email: get(row, "email")?,
        month: get(row, "month")?,
        year: get(row, "year")?,
        earnings: earnings.0,
        deductions: deductions.0,
        gross_salary: get(row, "gross_salary")?,
        total_deduction: get(row, "total_deduction")?,
        net_salary: get(row, "net_salary")?,
        lop_amount: get(row, "lop_amount")?,
        in_hand_salary: get(row, "in_hand_salary")?,
        pay_details: pay_details.map(|d| d.0),
        version: get(row, "version")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn row_to_employee(row: &MySqlRow) -> Result<Employee, StoreError> {
    let employee_id: String = get(row, "employee_id")?;
    let earnings: Json<Vec<LineItem>> = get(row, "earnings")?;
    let deductions: Json<Vec<LineItem>> = get(row, "deductions")?;

    Ok(Employee {
        employee_id: EmployeeCode::try_from(employee_id).map_err(|e| StoreError::Database(e.to_string()))?,
        salutation: get(row, "salutation")?,
        first_name: get(row, "first_name")?,
        last_name: get(row, "last_name")?,
        earnings: earnings.0,
        deductions: deductions.0,
        permanent_address: Address {
            mobile: get(row, "mobile")?,
            email: get(row, "email")?,
        },
    })
}

pub struct MySqlPayslipStore {
    pool: MySqlPool,
}

impl MySqlPayslipStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn duplicate_of(payslip: &Payslip) -> StoreError {
        StoreError::Duplicate {
            employee_id: payslip.employee_id.to_string(),
            month: payslip.month.clone(),
            year: payslip.year.clone(),
        }
    }
}

#[async_trait]
impl PayslipStore for MySqlPayslipStore {
    async fn insert(&self, payslip: Payslip) -> Result<Payslip, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO payslips
            (id, employee_id, employee_name, mobile, email, month, year,
             earnings, deductions, gross_salary, total_deduction, net_salary,
             lop_amount, in_hand_salary, pay_details, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payslip.id)
        .bind(payslip.employee_id.as_str())
        .bind(&payslip.employee_name)
        .bind(&payslip.mobile)
        .bind(&payslip.email)
        .bind(&payslip.month)
        .bind(&payslip.year)
        .bind(Json(&payslip.earnings))
        .bind(Json(&payslip.deductions))
        .bind(payslip.gross_salary)
        .bind(payslip.total_deduction)
        .bind(payslip.net_salary)
        .bind(payslip.lop_amount)
        .bind(payslip.in_hand_salary)
        .bind(payslip.pay_details.map(Json))
        .bind(payslip.version)
        .bind(payslip.created_at)
        .bind(payslip.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::duplicate_of(&payslip)
            } else {
                StoreError::from(e)
            }
        })?;

        debug!(payslip_id = %payslip.id, "Inserted payslip");
        Ok(payslip)
    }

    async fn update(&self, payslip: Payslip, expected_version: Option<u32>) -> Result<Payslip, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE payslips
            SET employee_name = ?, mobile = ?, email = ?, month = ?, year = ?,
                earnings = ?, deductions = ?,
                gross_salary = ?, total_deduction = ?, net_salary = ?,
                lop_amount = ?, in_hand_salary = ?, pay_details = ?,
                version = version + 1, updated_at = UTC_TIMESTAMP(6)
            WHERE id = ? AND (? IS NULL OR version = ?)
            "#,
        )
        .bind(&payslip.employee_name)
        .bind(&payslip.mobile)
        .bind(&payslip.email)
        .bind(&payslip.month)
        .bind(&payslip.year)
        .bind(Json(&payslip.earnings))
        .bind(Json(&payslip.deductions))
        .bind(payslip.gross_salary)
        .bind(payslip.total_deduction)
        .bind(payslip.net_salary)
        .bind(payslip.lop_amount)
        .bind(payslip.in_hand_salary)
        .bind(payslip.pay_details.map(Json))
        .bind(&payslip.id)
        .bind(expected_version)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::duplicate_of(&payslip)
            } else {
                StoreError::from(e)
            }
        })?;

        let stored = self.find_by_id(&payslip.id).await?.ok_or(StoreError::NotFound)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionMismatch { current: stored.version });
        }

        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payslip>, StoreError> {
        let sql = format!("SELECT {} FROM payslips WHERE id = ?", PAYSLIP_COLUMNS);

        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(row_to_payslip)
            .transpose()
    }

    async fn find_by_period(
        &self,
        employee_id: &EmployeeCode,
        month: &str,
        year: &str,
    ) -> Result<Option<Payslip>, StoreError> {
        let sql = format!(
            "SELECT {} FROM payslips WHERE employee_id = ? AND month = ? AND year = ? ORDER BY created_at ASC LIMIT 1",
            PAYSLIP_COLUMNS
        );

        sqlx::query(&sql)
            .bind(employee_id.as_str())
            .bind(month)
            .bind(year)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(row_to_payslip)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Payslip>, StoreError> {
        let sql = format!("SELECT {} FROM payslips ORDER BY created_at ASC", PAYSLIP_COLUMNS);

        sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(row_to_payslip)
            .collect()
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM payslips WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct MySqlEmployeeStore {
    pool: MySqlPool,
}

impl MySqlEmployeeStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for MySqlEmployeeStore {
    async fn find_by_code(&self, code: &EmployeeCode) -> Result<Option<Employee>, StoreError> {
        sqlx::query(
            r#"
            SELECT employee_id, salutation, first_name, last_name, mobile, email, earnings, deductions
            FROM employees
            WHERE employee_id = ?
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(row_to_employee)
        .transpose()
    }

    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let mut rows = sqlx::query(
            r#"
            SELECT employee_id, salutation, first_name, last_name, mobile, email, earnings, deductions
            FROM employees
            ORDER BY employee_id
            "#,
        )
        .fetch(&self.pool);

        let mut employees = Vec::new();
        while let Some(row) = rows.next().await {
            employees.push(row_to_employee(&row?)?);
        }

        Ok(employees)
    }

    async fn replace_defaults(
        &self,
        code: &EmployeeCode,
        earnings: &[LineItem],
        deductions: &[LineItem],
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE employees SET earnings = ?, deductions = ? WHERE employee_id = ?")
            .bind(Json(earnings))
            .bind(Json(deductions))
            .bind(code.as_str())
            .execute(&self.pool)
            .await?;

        // An unchanged row reports zero affected rows, so confirm it exists.
        if result.rows_affected() == 0 {
            let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE employee_id = ?")
                .bind(code.as_str())
                .fetch_one(&self.pool)
                .await?;

            if count == 0 {
                return Err(StoreError::NotFound);
            }
        }

        Ok(())
    }
}
