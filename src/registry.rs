//! Registration workflow.
//!
//! Validates a submission, enforces the per-operator quota, allocates a
//! form number, and persists the record. Lookup, listing, and the
//! scan-link verification step also go through here so the HTTP layer
//! never touches the repositories directly.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::allocator::FormNumberAllocator;
use crate::config::GlobalConfig;
use crate::models::worker::{Registration, WorkerRecord, WorkerStatus};
use crate::persistence::db::Database;
use crate::persistence::worker_repo::WorkerRepo;
use crate::{AppError, Result};

/// Worker registration service.
pub struct WorkerRegistry {
    workers: WorkerRepo,
    allocator: FormNumberAllocator,
    form_limit: u32,
}

impl WorkerRegistry {
    /// Build the registry over a shared database.
    #[must_use]
    pub fn new(db: Arc<Database>, config: &GlobalConfig) -> Self {
        Self {
            workers: WorkerRepo::new(Arc::clone(&db)),
            allocator: FormNumberAllocator::new(db, config.counter.floor),
            form_limit: config.form_limit_per_admin,
        }
    }

    /// Register a worker and return the persisted record.
    ///
    /// A form number is allocated only after validation and the quota
    /// check pass. If persisting the record fails afterwards, that number
    /// is never reused.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` if the submission is incomplete.
    /// - `AppError::LimitReached` if the operator has used their quota.
    /// - `AppError::Allocation` if no form number could be committed.
    /// - `AppError::Db` if the record cannot be stored.
    pub async fn register(&self, registration: Registration) -> Result<WorkerRecord> {
        registration.validate()?;

        let admin_id = registration.admin_id.trim().to_owned();
        let submitted = self.workers.count_for_admin(&admin_id).await?;
        if submitted >= u64::from(self.form_limit) {
            warn!(%admin_id, submitted, limit = self.form_limit, "registration quota reached");
            return Err(AppError::LimitReached(format!(
                "Limit Reached ({} forms)",
                self.form_limit
            )));
        }

        let form_no = self.allocator.allocate(registration.zone.as_deref()).await?;
        let record = registration.into_record(form_no);

        match self.workers.insert(&record).await {
            Ok(saved) => {
                info!(form_no = %saved.form_no, id = %saved.id, %admin_id, "worker registered");
                Ok(saved)
            }
            Err(err) => {
                error!(form_no = %record.form_no, %err, "failed to persist registration");
                Err(err)
            }
        }
    }

    /// Fetch one worker.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown identifier.
    pub async fn get(&self, id: &str) -> Result<WorkerRecord> {
        self.workers
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Worker not found".into()))
    }

    /// Every worker, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list(&self) -> Result<Vec<WorkerRecord>> {
        self.workers.list_all().await
    }

    /// Mark the worker verified, attaching the scanned paper form when a
    /// link is given. A blank link keeps whatever link is already stored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown identifier.
    pub async fn record_scan(&self, id: &str, drive_link: Option<&str>) -> Result<WorkerRecord> {
        let link = drive_link.map(str::trim).filter(|l| !l.is_empty());
        let updated = self
            .workers
            .update_verification(id, WorkerStatus::Verified, link)
            .await?;
        info!(form_no = %updated.form_no, link_attached = link.is_some(), "worker verified");
        Ok(updated)
    }
}
