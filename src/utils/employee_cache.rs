use std::{sync::Arc, time::Duration};

use anyhow::Result;
use moka::future::Cache;

use crate::{
    model::employee::{Employee, EmployeeCode},
    store::{EmployeeStore, StoreError},
};

/// Read-through cache over the employee store, keyed by uppercase
/// employee code. Writers must call [`EmployeeCache::invalidate`].
pub struct EmployeeCache {
    store: Arc<dyn EmployeeStore>,
    cache: Cache<String, Employee>,
}

impl EmployeeCache {
    pub fn new(store: Arc<dyn EmployeeStore>, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            store,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn find(&self, code: &EmployeeCode) -> Result<Option<Employee>, StoreError> {
        if let Some(employee) = self.cache.get(code.as_str()).await {
            return Ok(Some(employee));
        }

        let employee = self.store.find_by_code(code).await?;
        if let Some(employee) = &employee {
            self.cache.insert(code.to_string(), employee.clone()).await;
        }

        Ok(employee)
    }

    pub async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        self.store.list().await
    }

    pub async fn invalidate(&self, code: &EmployeeCode) {
        self.cache.invalidate(code.as_str()).await;
    }

    /// Reloads one entry from the store after a write, replacing whatever a
    /// concurrent reader may have cached in between.
    pub async fn refresh(&self, code: &EmployeeCode) -> Result<(), StoreError> {
        match self.store.find_by_code(code).await? {
            Some(employee) => self.cache.insert(code.to_string(), employee).await,
            None => self.cache.invalidate(code.as_str()).await,
        }

        Ok(())
    }

    /// Batch insert employees into the cache
    async fn batch_insert(&self, employees: &[Employee]) {
        let futures: Vec<_> = employees
            .iter()
            .map(|e| self.cache.insert(e.employee_id.to_string(), e.clone()))
            .collect();

        // Await all insertions concurrently
        futures::future::join_all(futures).await;
    }

    /// Preload every employee profile so the first prefill lookups skip the store
    pub async fn warmup(&self, batch_size: usize) -> Result<usize> {
        let employees = self.store.list().await?;

        for batch in employees.chunks(batch_size.max(1)) {
            self.batch_insert(batch).await;
        }

        log::info!("Employee cache warmup complete: {} employees", employees.len());

        Ok(employees.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryEmployeeStore, tests::employee};
    use pretty_assertions::assert_eq;

    fn cache_over(store: Arc<MemoryEmployeeStore>) -> EmployeeCache {
        EmployeeCache::new(store, 100, Duration::from_secs(60))
    }

    #[actix_web::test]
    async fn test_find_serves_stale_entry_until_invalidated() {
        let store = Arc::new(MemoryEmployeeStore::with_employees([employee("EMP001", "John")]));
        let cache = cache_over(store.clone());
        let code = EmployeeCode::parse("emp001").unwrap();

        let first = cache.find(&code).await.unwrap().unwrap();
        assert_eq!(first.earnings.len(), 1);

        store.replace_defaults(&code, &[], &[]).await.unwrap();
        assert_eq!(cache.find(&code).await.unwrap().unwrap().earnings.len(), 1);

        cache.invalidate(&code).await;
        assert!(cache.find(&code).await.unwrap().unwrap().earnings.is_empty());
    }

    #[actix_web::test]
    async fn test_refresh_replaces_stale_entry() {
        let store = Arc::new(MemoryEmployeeStore::with_employees([employee("EMP001", "John")]));
        let cache = cache_over(store.clone());
        let code = EmployeeCode::parse("EMP001").unwrap();

        cache.find(&code).await.unwrap();
        store.replace_defaults(&code, &[], &[]).await.unwrap();
        cache.refresh(&code).await.unwrap();

        assert!(cache.find(&code).await.unwrap().unwrap().earnings.is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_code_is_not_cached() {
        let store = Arc::new(MemoryEmployeeStore::new());
        let cache = cache_over(store);

        let code = EmployeeCode::parse("EMP404").unwrap();
        assert_eq!(cache.find(&code).await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_warmup_loads_everyone() {
        let store = Arc::new(MemoryEmployeeStore::with_employees([
            employee("EMP001", "John"),
            employee("EMP002", "Jane"),
            employee("EMP003", "Jim"),
        ]));
        let cache = cache_over(store);

        assert_eq!(cache.warmup(2).await.unwrap(), 3);
    }
}
