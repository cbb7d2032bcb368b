//! Worker record repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::worker::{WorkerProfile, WorkerRecord, WorkerStatus};
use crate::{AppError, Result};

use super::db::Database;

const COLUMNS: &str = "id, form_no, admin_id, zone, status, created_at, photo_url, scan_link, \
     designation, name, fh_name, dob, sex, blood_group, category, marital_status, mobile_no, \
     email, communication_address, address, education, aadhaar_no, pan_no, eshram_no, \
     acc_name, acc_no, ifsc, bank_name, division, shed";

/// Repository for worker registration records.
#[derive(Clone)]
pub struct WorkerRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct WorkerRow {
    id: String,
    form_no: String,
    admin_id: String,
    zone: Option<String>,
    status: String,
    created_at: String,
    photo_url: Option<String>,
    scan_link: Option<String>,
    designation: Option<String>,
    name: Option<String>,
    fh_name: Option<String>,
    dob: Option<String>,
    sex: Option<String>,
    blood_group: Option<String>,
    category: Option<String>,
    marital_status: Option<String>,
    mobile_no: Option<String>,
    email: Option<String>,
    communication_address: Option<String>,
    address: Option<String>,
    education: Option<String>,
    aadhaar_no: Option<String>,
    pan_no: Option<String>,
    eshram_no: Option<String>,
    acc_name: Option<String>,
    acc_no: Option<String>,
    ifsc: Option<String>,
    bank_name: Option<String>,
    division: Option<String>,
    shed: Option<String>,
}

impl WorkerRow {
    fn into_record(self) -> Result<WorkerRecord> {
        let status = WorkerStatus::parse(&self.status)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AppError::Db(format!("invalid created_at: {e}")))?
            .with_timezone(&Utc);

        Ok(WorkerRecord {
            id: self.id,
            form_no: self.form_no,
            admin_id: self.admin_id,
            zone: self.zone,
            status,
            created_at,
            photo_url: self.photo_url,
            scan_link: self.scan_link,
            profile: WorkerProfile {
                designation: self.designation,
                name: self.name,
                fh_name: self.fh_name,
                dob: self.dob,
                sex: self.sex,
                blood_group: self.blood_group,
                category: self.category,
                marital_status: self.marital_status,
                mobile_no: self.mobile_no,
                email: self.email,
                communication_address: self.communication_address,
                address: self.address,
                education: self.education,
                aadhaar_no: self.aadhaar_no,
                pan_no: self.pan_no,
                eshram_no: self.eshram_no,
                acc_name: self.acc_name,
                acc_no: self.acc_no,
                ifsc: self.ifsc,
                bank_name: self.bank_name,
                division: self.division,
                shed: self.shed,
            },
        })
    }
}

/// Fixed-width timestamps keep lexical and chronological order identical.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl WorkerRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new worker record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails, including a duplicate
    /// form number.
    pub async fn insert(&self, record: &WorkerRecord) -> Result<WorkerRecord> {
        let p = &record.profile;
        sqlx::query(&format!(
            "INSERT INTO worker ({COLUMNS}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, \
              ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30)"
        ))
        .bind(&record.id)
        .bind(&record.form_no)
        .bind(&record.admin_id)
        .bind(&record.zone)
        .bind(record.status.as_str())
        .bind(timestamp(record.created_at))
        .bind(&record.photo_url)
        .bind(&record.scan_link)
        .bind(&p.designation)
        .bind(&p.name)
        .bind(&p.fh_name)
        .bind(&p.dob)
        .bind(&p.sex)
        .bind(&p.blood_group)
        .bind(&p.category)
        .bind(&p.marital_status)
        .bind(&p.mobile_no)
        .bind(&p.email)
        .bind(&p.communication_address)
        .bind(&p.address)
        .bind(&p.education)
        .bind(&p.aadhaar_no)
        .bind(&p.pan_no)
        .bind(&p.eshram_no)
        .bind(&p.acc_name)
        .bind(&p.acc_no)
        .bind(&p.ifsc)
        .bind(&p.bank_name)
        .bind(&p.division)
        .bind(&p.shed)
        .execute(self.db.as_ref())
        .await?;

        Ok(record.clone())
    }

    /// Retrieve a worker by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<WorkerRecord>> {
        let row: Option<WorkerRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM worker WHERE id = ?1"))
                .bind(id)
                .fetch_optional(self.db.as_ref())
                .await?;

        row.map(WorkerRow::into_record).transpose()
    }

    /// List every worker, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<WorkerRecord>> {
        let rows: Vec<WorkerRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM worker ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(WorkerRow::into_record).collect()
    }

    /// Count registrations submitted by one operator.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count_for_admin(&self, admin_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM worker WHERE admin_id = ?1")
            .bind(admin_id)
            .fetch_one(self.db.as_ref())
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Record the outcome of the paper-form verification step.
    ///
    /// `scan_link` of `None` keeps the previously stored link.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no worker has this identifier, or
    /// `AppError::Db` if the update fails.
    pub async fn update_verification(
        &self,
        id: &str,
        status: WorkerStatus,
        scan_link: Option<&str>,
    ) -> Result<WorkerRecord> {
        let result = sqlx::query(
            "UPDATE worker SET status = ?1, scan_link = COALESCE(?2, scan_link) WHERE id = ?3",
        )
        .bind(status.as_str())
        .bind(scan_link)
        .bind(id)
        .execute(self.db.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("worker not found".into()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("worker not found".into()))
    }
}
