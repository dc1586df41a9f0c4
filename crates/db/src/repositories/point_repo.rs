//! Read-only point-of-sale projection for the admin screens.

use pointcam_core::pagination::{clamp_limit, clamp_offset};
use pointcam_core::status::WebcamStatus;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::point::{PointWebcam, PointWebcamFilter};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Points with their webcam count and first webcam (lowest id).
const SELECT: &str = "SELECT p.id, p.spid, p.name, p.address, c.name AS city_name, \
        (SELECT COUNT(*) FROM webcams x WHERE x.point_id = p.id) AS webcam_count, \
        fw.id AS wc_id, fw.installed AS wc_installed, \
        NULLIF(TRIM(fr.last_name || ' ' || fr.first_name), '') AS wc_responsible, \
        fw.online AS wc_online, fw.ip AS wc_ip \
    FROM points p \
    LEFT JOIN cities c ON c.id = p.city_id \
    LEFT JOIN LATERAL ( \
        SELECT w.id, w.installed, w.responsible_id, w.online, w.ip \
        FROM webcams w WHERE w.point_id = p.id ORDER BY w.id LIMIT 1 \
    ) fw ON TRUE \
    LEFT JOIN profiles fr ON fr.id = fw.responsible_id \
    WHERE p.has_webcams";

pub struct PointWebcamRepo;

impl PointWebcamRepo {
    /// List points that may host webcams, ordered by spid.
    ///
    /// An unknown status name in `filter.online` is ignored.
    pub async fn list(
        pool: &PgPool,
        filter: &PointWebcamFilter,
    ) -> Result<Vec<PointWebcam>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT);

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(exact) = search.strip_prefix('=') {
                qb.push(" AND p.spid = ").push_bind(exact.trim().to_string());
            } else {
                let pattern = format!("%{search}%");
                qb.push(" AND (p.name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR p.address ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR c.name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(
                        " OR EXISTS (SELECT 1 FROM webcams w \
                         LEFT JOIN profiles r ON r.id = w.responsible_id \
                         WHERE w.point_id = p.id AND (w.name ILIKE ",
                    )
                    .push_bind(pattern.clone())
                    .push(" OR w.ip ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR r.first_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR r.last_name ILIKE ")
                    .push_bind(pattern)
                    .push(")))");
            }
        }

        if let Some(city_id) = filter.city_id {
            qb.push(" AND p.city_id = ").push_bind(city_id);
        }
        if let Some(status) = filter.online.as_deref().and_then(WebcamStatus::from_name) {
            qb.push(" AND EXISTS (SELECT 1 FROM webcams w WHERE w.point_id = p.id AND w.online = ")
                .push_bind(status.code())
                .push(")");
        }
        if let Some(responsible_id) = filter.responsible_id {
            qb.push(
                " AND EXISTS (SELECT 1 FROM webcams w WHERE w.point_id = p.id \
                 AND w.responsible_id = ",
            )
            .push_bind(responsible_id)
            .push(")");
        }

        qb.push(" ORDER BY p.spid LIMIT ")
            .push_bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .push(" OFFSET ")
            .push_bind(clamp_offset(filter.offset));

        qb.build_query_as::<PointWebcam>().fetch_all(pool).await
    }

    /// Find one point by spid.
    pub async fn find_by_spid(
        pool: &PgPool,
        spid: &str,
    ) -> Result<Option<PointWebcam>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT);
        qb.push(" AND p.spid = ").push_bind(spid.to_string());
        qb.build_query_as::<PointWebcam>()
            .fetch_optional(pool)
            .await
    }
}
