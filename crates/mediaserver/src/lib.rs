//! Client for the media server's archive inventory API.

pub mod api;

use pointcam_core::filter::ArchiveIndex;

pub use api::{ArchiveInventory, InventoryClient, InventoryError};

/// Resolve `archive_date` filter values into point id sets.
///
/// A date the inventory cannot answer for resolves to no points, so the
/// filter matches nothing for it instead of failing the request.
pub async fn resolve_archive_index(
    inventory: &dyn ArchiveInventory,
    dates: &[&str],
) -> ArchiveIndex {
    let mut index = ArchiveIndex::new();
    for date in dates {
        let points = match inventory.points_by_date(Some(date)).await {
            Ok(points) => points,
            Err(e) => {
                tracing::warn!(error = %e, date, "Points by date unavailable, matching none");
                Vec::new()
            }
        };
        index.insert((*date).to_string(), points);
    }
    index
}
