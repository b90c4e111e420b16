use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod config;
mod db;
mod docs;
mod model;
mod routes;
mod service;
mod store;
mod utils;

use config::{Config, StorageBackend};
use db::{init_db, run_migrations};

use crate::docs::ApiDoc;
use crate::service::payslip::PayslipService;
use crate::service::profile_sync::EmployeeProfileSync;
use crate::store::memory::{MemoryEmployeeStore, MemoryPayslipStore, load_seed};
use crate::store::mysql::{MySqlEmployeeStore, MySqlPayslipStore};
use crate::store::{EmployeeStore, PayslipStore};
use crate::utils::employee_cache::EmployeeCache;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Payslip service is running"
}

async fn build_stores(config: &Config) -> anyhow::Result<(Arc<dyn PayslipStore>, Arc<dyn EmployeeStore>)> {
    match config.storage_backend {
        StorageBackend::Mysql => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORAGE_BACKEND is mysql")?;
            let pool = init_db(database_url).await?;
            run_migrations(&pool).await?;

            let payslips: Arc<dyn PayslipStore> = Arc::new(MySqlPayslipStore::new(pool.clone()));
            let employees: Arc<dyn EmployeeStore> = Arc::new(MySqlEmployeeStore::new(pool));
            Ok((payslips, employees))
        }
        StorageBackend::Memory => {
            let employees = match &config.employee_seed_file {
                Some(path) => load_seed(path)?,
                None => {
                    warn!("No EMPLOYEE_SEED_FILE set, memory backend starts without employees");
                    Vec::new()
                }
            };
            info!(employees = employees.len(), "Using in-memory storage");

            let payslips: Arc<dyn PayslipStore> = Arc::new(MemoryPayslipStore::new());
            let employees: Arc<dyn EmployeeStore> = Arc::new(MemoryEmployeeStore::with_employees(employees));
            Ok((payslips, employees))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "payslip.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = %config.storage_backend, "Server starting...");

    let (payslips, employees) = build_stores(&config).await?;

    let cache = Arc::new(EmployeeCache::new(
        employees.clone(),
        config.employee_cache_capacity,
        config.employee_cache_ttl,
    ));
    let sync = Arc::new(EmployeeProfileSync::new(employees, cache.clone()));
    let service = Data::new(PayslipService::new(payslips, cache.clone(), sync));

    actix_web::rt::spawn(async move {
        if let Err(e) = cache.warmup(250).await {
            error!(error = %e, "Failed to warmup employee cache");
        }
    });

    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();
    // One limiter shared by every worker.
    let limiter = Arc::new(routes::build_limiter(config.rate_per_min)?);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix, limiter.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
