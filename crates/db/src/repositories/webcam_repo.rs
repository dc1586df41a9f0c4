//! Repository for the `webcams` table and the joined list records.

use pointcam_core::filter::{FilterQuery, SortKey};
use pointcam_core::monitor::SENTINEL_IP;
use pointcam_core::status::WebcamStatus;
use pointcam_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::filter_sql::{self, RECORD_FROM, RECORD_SELECT};
use crate::models::webcam::{CreateWebcam, UpdateWebcam, Webcam, WebcamRecord};

/// Column list for webcams queries.
const COLUMNS: &str = "id, point_id, name, slug, responsible_id, ip, port, host, installed, \
    online, created_at";

/// Upper bound on autocomplete suggestions.
pub const AUTOCOMPLETE_LIMIT: i64 = 50;

/// Provides CRUD, list and status operations for webcams.
pub struct WebcamRepo;

impl WebcamRepo {
    /// Insert a new webcam, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWebcam) -> Result<Webcam, sqlx::Error> {
        let query = format!(
            "INSERT INTO webcams \
                (point_id, name, slug, responsible_id, ip, port, host, installed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, CURRENT_DATE)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Webcam>(&query)
            .bind(input.point_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.responsible_id)
            .bind(input.ip_or_default())
            .bind(input.port_or_default())
            .bind(&input.host)
            .bind(input.installed)
            .fetch_one(pool)
            .await
    }

    /// List webcam rows by id for the admin screens.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Webcam>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webcams ORDER BY id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Webcam>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a webcam by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Webcam>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webcams WHERE id = $1");
        sqlx::query_as::<_, Webcam>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a webcam by its point's spid and its slug.
    pub async fn find_by_point_and_slug(
        pool: &PgPool,
        spid: &str,
        slug: &str,
    ) -> Result<Option<Webcam>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM webcams w JOIN points p ON p.id = w.point_id \
             WHERE p.spid = $1 AND w.slug = $2",
            qualified_columns()
        );
        sqlx::query_as::<_, Webcam>(&query)
            .bind(spid)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Update a webcam. Returns `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWebcam,
    ) -> Result<Option<Webcam>, sqlx::Error> {
        let query = format!(
            "UPDATE webcams SET \
                point_id       = COALESCE($2, point_id), \
                name           = COALESCE($3, name), \
                slug           = COALESCE($4, slug), \
                responsible_id = COALESCE($5, responsible_id), \
                ip             = COALESCE($6, ip), \
                port           = COALESCE($7, port), \
                host           = COALESCE($8, host), \
                installed      = COALESCE($9, installed) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Webcam>(&query)
            .bind(id)
            .bind(input.point_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.responsible_id)
            .bind(&input.ip)
            .bind(input.port)
            .bind(&input.host)
            .bind(input.installed)
            .fetch_optional(pool)
            .await
    }

    /// One page of list records matching `filter`.
    pub async fn list_records(
        pool: &PgPool,
        filter: &FilterQuery,
        ordering: &[SortKey],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WebcamRecord>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(RECORD_SELECT);
        filter_sql::push_where(&mut qb, filter);
        filter_sql::push_order_by(&mut qb, ordering);
        qb.push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<WebcamRecord>().fetch_all(pool).await
    }

    /// Every list record matching `filter`, for export.
    pub async fn list_all_records(
        pool: &PgPool,
        filter: &FilterQuery,
        ordering: &[SortKey],
    ) -> Result<Vec<WebcamRecord>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(RECORD_SELECT);
        filter_sql::push_where(&mut qb, filter);
        filter_sql::push_order_by(&mut qb, ordering);
        qb.build_query_as::<WebcamRecord>().fetch_all(pool).await
    }

    /// Number of list records matching `filter`.
    pub async fn count_records(pool: &PgPool, filter: &FilterQuery) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) {RECORD_FROM}"));
        filter_sql::push_where(&mut qb, filter);
        let (count,) = qb.build_query_as::<(i64,)>().fetch_one(pool).await?;
        Ok(count)
    }

    /// Webcams a status sweep should visit: everything except unconfigured
    /// cameras already marked off.
    pub async fn list_sweep_targets(pool: &PgPool) -> Result<Vec<Webcam>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM webcams \
             WHERE NOT (ip = $1 AND online = $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Webcam>(&query)
            .bind(SENTINEL_IP)
            .bind(WebcamStatus::Off.code())
            .fetch_all(pool)
            .await
    }

    /// Persist a new status. Only the `online` column is touched.
    pub async fn update_online(
        pool: &PgPool,
        id: DbId,
        status: WebcamStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE webcams SET online = $2 WHERE id = $1")
            .bind(id)
            .bind(status.code())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Distinct values of a field containing `q`, case-insensitively.
    ///
    /// `responsible.last_name` yields full names. Returns `None` for fields
    /// without a column.
    pub async fn autocomplete(
        pool: &PgPool,
        field: &str,
        q: &str,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let expr = match field {
            "responsible.last_name" => "TRIM(r.last_name || ' ' || r.first_name)",
            "installed" => "to_char(w.installed, 'DD.MM.YYYY')",
            "online" => return Ok(None),
            other => match filter_sql::column(other) {
                Some(column) => column.filter,
                None => return Ok(None),
            },
        };

        let query = format!(
            "SELECT DISTINCT {expr} AS value {RECORD_FROM} \
             WHERE {expr} IS NOT NULL AND {expr} ILIKE $1 \
             ORDER BY 1 \
             LIMIT $2"
        );
        let rows: Vec<(String,)> = sqlx::query_as(&query)
            .bind(format!("%{}%", escape_like(q)))
            .bind(AUTOCOMPLETE_LIMIT)
            .fetch_all(pool)
            .await?;
        Ok(Some(rows.into_iter().map(|(value,)| value).collect()))
    }
}

fn qualified_columns() -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("w.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
