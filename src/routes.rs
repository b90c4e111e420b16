use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware};
use actix_web::web;
use anyhow::{Context, Result};

use crate::{
    api::{employee, payslip},
    service::error::PayslipError,
};

/// Per-IP limiter refilling `requests_per_min` tokens every minute.
pub fn build_limiter(requests_per_min: u32) -> Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        60_000
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("Invalid rate limiter configuration")?;

    Ok(Governor::new(&cfg))
}

pub fn configure(
    cfg: &mut web::ServiceConfig,
    api_prefix: &str,
    limiter: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
) {
    cfg.service(web::scope(api_prefix).wrap(limiter).configure(api));
}

/// Payslip and employee routes, without prefix or rate limiting.
pub fn api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| PayslipError::Validation(format!("Invalid request body: {}", err)).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| PayslipError::Validation(format!("Invalid query: {}", err)).into()),
    )
    .service(
        web::scope("/payslips")
            // /payslips
            .service(
                web::resource("")
                    .route(web::post().to(payslip::create_payslip))
                    .route(web::get().to(payslip::list_payslips)),
            )
            // /payslips/employee?employeeId=&month=&year=
            .service(web::resource("/employee").route(web::get().to(payslip::find_by_period)))
            // /payslips/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(payslip::get_payslip))
                    .route(web::put().to(payslip::update_payslip))
                    .route(web::delete().to(payslip::delete_payslip)),
            ),
    )
    .service(
        web::scope("/employees")
            .service(web::resource("").route(web::get().to(employee::list_employees)))
            .service(web::resource("/{employee_id}").route(web::get().to(employee::get_employee))),
    );
}
