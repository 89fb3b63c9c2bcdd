//! Prescription Repository

use shared::models::PrescriptionCreate;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, qualified_id};
use crate::db::models::Prescription;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};

const TABLE: &str = "prescription";

#[derive(Clone)]
pub struct PrescriptionRepository {
    base: BaseRepository,
}

impl PrescriptionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record a prescription for `data.user_id`; the patient must exist (checked by the caller)
    pub async fn create(
        &self,
        prescribed_by: &str,
        data: PrescriptionCreate,
    ) -> RepoResult<Prescription> {
        for (value, field) in [
            (&data.medication_name, "medication_name"),
            (&data.dosage, "dosage"),
            (&data.frequency, "frequency"),
        ] {
            validate_required_text(value, field, MAX_NAME_LEN)
                .map_err(|e| RepoError::Validation(e.message))?;
        }
        validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)
            .map_err(|e| RepoError::Validation(e.message))?;
        if let Some(end) = data.end_date
            && end < data.start_date
        {
            return Err(RepoError::Validation(format!(
                "end_date ({}) must not be before start_date ({})",
                end, data.start_date
            )));
        }

        let prescription = Prescription {
            id: None,
            user: qualified_id("user", data.user_id.trim()),
            prescribed_by: prescribed_by.to_string(),
            medication_name: data.medication_name.trim().to_string(),
            dosage: data.dosage.trim().to_string(),
            frequency: data.frequency.trim().to_string(),
            start_date: data.start_date,
            end_date: data.end_date,
            notes: data.notes.filter(|n| !n.trim().is_empty()),
            created_at: now_millis(),
        };

        let created: Option<Prescription> =
            self.base.db().create(TABLE).content(prescription).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create prescription".to_string()))
    }

    /// Prescriptions of one patient, latest start first
    pub async fn find_for_user(&self, user_id: &str) -> RepoResult<Vec<Prescription>> {
        let prescriptions: Vec<Prescription> = self
            .base
            .db()
            .query("SELECT * FROM prescription WHERE user = $user ORDER BY start_date DESC")
            .bind(("user", qualified_id("user", user_id)))
            .await?
            .take(0)?;
        Ok(prescriptions)
    }
}
