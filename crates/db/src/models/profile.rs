use pointcam_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

use super::webcam::full_name;

/// A profile that is responsible for at least one webcam.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Responsible {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
}

impl Responsible {
    pub fn full_name(&self) -> String {
        full_name(&self.last_name, &self.first_name)
    }
}
