use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    model::{employee::EmployeeCode, line_item::LineItem},
    store::{EmployeeStore, StoreError},
    utils::employee_cache::EmployeeCache,
};

/// Write-through of the latest payslip structure onto the employee profile,
/// so the next payslip for that employee prefills from it.
#[async_trait]
pub trait ProfileSync: Send + Sync {
    async fn sync_defaults(
        &self,
        employee_id: &EmployeeCode,
        earnings: &[LineItem],
        deductions: &[LineItem],
    ) -> Result<(), StoreError>;
}

pub struct EmployeeProfileSync {
    store: Arc<dyn EmployeeStore>,
    cache: Arc<EmployeeCache>,
}

impl EmployeeProfileSync {
    pub fn new(store: Arc<dyn EmployeeStore>, cache: Arc<EmployeeCache>) -> Self {
        Self { store, cache }
    }
}

#[async_trait]
impl ProfileSync for EmployeeProfileSync {
    async fn sync_defaults(
        &self,
        employee_id: &EmployeeCode,
        earnings: &[LineItem],
        deductions: &[LineItem],
    ) -> Result<(), StoreError> {
        if let Err(e) = self.store.replace_defaults(employee_id, earnings, deductions).await {
            // A failed write may still have landed.
            self.cache.invalidate(employee_id).await;
            return Err(e);
        }

        // Overwrite so a lookup that read the old row cannot put it back.
        if let Err(e) = self.cache.refresh(employee_id).await {
            warn!(error = %e, employee_id = %employee_id, "Failed to reload employee cache entry");
            self.cache.invalidate(employee_id).await;
        }

        debug!(
            employee_id = %employee_id,
            earnings = earnings.len(),
            deductions = deductions.len(),
            "Synced employee default pay structure"
        );
        Ok(())
    }
}
