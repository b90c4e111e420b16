use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{model::employee::Employee, service::payslip::PayslipService};

#[derive(Serialize, ToSchema)]
pub struct EmployeeResponse {
    #[schema(example = true)]
    pub success: bool,
    pub data: Employee,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(example = true)]
    pub success: bool,
    pub data: Vec<Employee>,
}

/// Get Employee
///
/// Used by the payslip form to prefill name, contact and the default pay
/// structure. The code is matched case-insensitively.
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", description = "Employee code", example = "EMP001")
    ),
    responses(
        (status = 200, body = EmployeeResponse),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    service: web::Data<PayslipService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee = service.get_employee(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(EmployeeResponse {
        success: true,
        data: employee,
    }))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, body = EmployeeListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(service: web::Data<PayslipService>) -> actix_web::Result<impl Responder> {
    let employees = service.list_employees().await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        success: true,
        data: employees,
    }))
}
