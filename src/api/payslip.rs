use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    model::payslip::{CreatePayslip, PeriodQuery, Payslip, UpdatePayslip},
    service::payslip::PayslipService,
};

#[derive(Serialize, ToSchema)]
pub struct PayslipResponse {
    #[schema(example = true)]
    pub success: bool,
    pub data: Payslip,
}

#[derive(Serialize, ToSchema)]
pub struct PayslipListResponse {
    #[schema(example = true)]
    pub success: bool,
    pub data: Vec<Payslip>,
}

/// `data` is null when no payslip exists for the period.
#[derive(Serialize, ToSchema)]
pub struct PayslipLookupResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(nullable = true)]
    pub data: Option<Payslip>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Payslip deleted successfully")]
    pub message: String,
}

/// Create Payslip
#[utoipa::path(
    post,
    path = "/api/payslips",
    request_body = CreatePayslip,
    responses(
        (status = 200, description = "Payslip created", body = PayslipResponse),
        (status = 400, description = "Missing employee or period", body = Object, example = json!({
            "success": false,
            "message": "Please select month & year"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        })),
        (status = 409, description = "A payslip already exists for the period"),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "success": false,
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Payslip"
)]
pub async fn create_payslip(
    service: web::Data<PayslipService>,
    payload: web::Json<CreatePayslip>,
) -> actix_web::Result<impl Responder> {
    let payslip = service.create(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PayslipResponse {
        success: true,
        data: payslip,
    }))
}

/// List Payslips
#[utoipa::path(
    get,
    path = "/api/payslips",
    responses(
        (status = 200, description = "Every payslip, oldest first", body = PayslipListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
pub async fn list_payslips(service: web::Data<PayslipService>) -> actix_web::Result<impl Responder> {
    let payslips = service.list().await?;

    Ok(HttpResponse::Ok().json(PayslipListResponse {
        success: true,
        data: payslips,
    }))
}

/// Find Payslip by Employee and Period
#[utoipa::path(
    get,
    path = "/api/payslips/employee",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Payslip for the period, or null", body = PayslipLookupResponse),
        (status = 400, description = "Missing query parameter")
    ),
    tag = "Payslip"
)]
pub async fn find_by_period(
    service: web::Data<PayslipService>,
    query: web::Query<PeriodQuery>,
) -> actix_web::Result<impl Responder> {
    let payslip = service.find_by_period(&query).await?;

    Ok(HttpResponse::Ok().json(PayslipLookupResponse {
        success: true,
        data: payslip,
    }))
}

/// Get Payslip
#[utoipa::path(
    get,
    path = "/api/payslips/{id}",
    params(
        ("id", description = "Payslip ID")
    ),
    responses(
        (status = 200, body = PayslipResponse),
        (status = 404, description = "Payslip not found")
    ),
    tag = "Payslip"
)]
pub async fn get_payslip(
    service: web::Data<PayslipService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let payslip = service.get(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PayslipResponse {
        success: true,
        data: payslip,
    }))
}

/// Update Payslip
#[utoipa::path(
    put,
    path = "/api/payslips/{id}",
    request_body = UpdatePayslip,
    params(
        ("id", description = "Payslip ID")
    ),
    responses(
        (status = 200, description = "Payslip updated", body = PayslipResponse),
        (status = 400, description = "Missing period"),
        (status = 404, description = "Payslip not found"),
        (status = 409, description = "Stale version or period already taken")
    ),
    tag = "Payslip"
)]
pub async fn update_payslip(
    service: web::Data<PayslipService>,
    path: web::Path<String>,
    body: web::Json<UpdatePayslip>,
) -> actix_web::Result<impl Responder> {
    let payslip_id = path.into_inner();
    let payslip = service.update(&payslip_id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PayslipResponse {
        success: true,
        data: payslip,
    }))
}

/// Delete Payslip
#[utoipa::path(
    delete,
    path = "/api/payslips/{id}",
    params(
        ("id", description = "Payslip ID")
    ),
    responses(
        (status = 200, description = "Payslip deleted", body = MessageResponse),
        (status = 404, description = "Payslip not found")
    ),
    tag = "Payslip"
)]
pub async fn delete_payslip(
    service: web::Data<PayslipService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    service.delete(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Payslip deleted successfully".to_string(),
    }))
}
