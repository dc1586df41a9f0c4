use sqlx::PgPool;

use crate::models::profile::Responsible;

pub struct ProfileRepo;

impl ProfileRepo {
    /// Profiles responsible for at least one webcam, by last then first name.
    pub async fn list_responsibles(pool: &PgPool) -> Result<Vec<Responsible>, sqlx::Error> {
        sqlx::query_as::<_, Responsible>(
            "SELECT r.id, r.first_name, r.last_name FROM profiles r \
             WHERE EXISTS (SELECT 1 FROM webcams w WHERE w.responsible_id = r.id) \
             ORDER BY r.last_name, r.first_name, r.id",
        )
        .fetch_all(pool)
        .await
    }
}
