//! Form number allocation.
//!
//! Every registration receives `SGWC/<ZONE>/<NNNNNN>` where the numeric
//! part comes from a single counter shared by all zones. The counter lives
//! in the database and is advanced with one atomic statement, so numbers
//! stay unique across concurrent requests and across service instances
//! sharing the same database.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::models::counter::format_form_number;
use crate::persistence::counter_repo::CounterRepo;
use crate::persistence::db::Database;
use crate::{AppError, Result};

/// Allocates sequential, zone-tagged form numbers.
pub struct FormNumberAllocator {
    counter: CounterRepo,
    floor: i64,
    seeded: OnceCell<()>,
}

impl FormNumberAllocator {
    /// Create an allocator whose counter starts at `floor` if it does not
    /// exist yet. The first issued number is `floor + 1`.
    #[must_use]
    pub fn new(db: Arc<Database>, floor: i64) -> Self {
        Self {
            counter: CounterRepo::new(db),
            floor,
            seeded: OnceCell::new(),
        }
    }

    /// Allocate the next form number for `zone`.
    ///
    /// The number is only returned after the incremented counter has been
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Allocation` if the counter cannot be created,
    /// read, or persisted.
    pub async fn allocate(&self, zone: Option<&str>) -> Result<String> {
        self.ensure_seeded().await?;

        let counter = self
            .counter
            .increment_and_fetch()
            .await
            .map_err(|err| AppError::Allocation(format!("failed to advance counter: {err}")))?;

        let form_no = format_form_number(zone, counter.last_id);
        debug!(%form_no, last_id = counter.last_id, "form number allocated");
        Ok(form_no)
    }

    /// Create the counter row at the floor exactly once per process; the
    /// insert itself is a no-op when another instance already seeded it.
    async fn ensure_seeded(&self) -> Result<()> {
        self.seeded
            .get_or_try_init(|| async {
                let counter = self.counter.create(self.floor).await.map_err(|err| {
                    AppError::Allocation(format!("failed to initialize counter: {err}"))
                })?;
                info!(last_id = counter.last_id, "sequence counter ready");
                Ok::<(), AppError>(())
            })
            .await?;
        Ok(())
    }
}
