//! Repository for `webcam_filter_templates`.
//!
//! Every query is scoped by owner: another user's template is
//! indistinguishable from a missing one.

use pointcam_core::types::DbId;
use sqlx::PgPool;

use crate::models::filter_template::{
    CreateFilterTemplate, FilterTemplate, UpdateFilterTemplate,
};

const COLUMNS: &str = "id, title, filters, user_id, created_at, updated_at";

pub struct FilterTemplateRepo;

impl FilterTemplateRepo {
    /// A user's templates, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<FilterTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM webcam_filter_templates \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, FilterTemplate>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<FilterTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM webcam_filter_templates WHERE id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, FilterTemplate>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateFilterTemplate,
    ) -> Result<FilterTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO webcam_filter_templates (title, filters, user_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FilterTemplate>(&query)
            .bind(&input.title)
            .bind(&input.filters)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Update a template owned by `user_id`. The owner never changes.
    pub async fn update_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateFilterTemplate,
    ) -> Result<Option<FilterTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE webcam_filter_templates SET \
                title      = COALESCE($3, title), \
                filters    = COALESCE($4, filters), \
                updated_at = now() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FilterTemplate>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.filters)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM webcam_filter_templates WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
