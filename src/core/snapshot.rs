use serde::{Deserialize, Serialize};

use crate::core::catalog::Catalog;
use crate::core::status::{CountryStatus, StatusMap};

/// One row of an export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: String,
    pub code: String,
    pub name: String,
    pub status: CountryStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("file does not contain travel map data: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// The two accepted import shapes, resolved by a single untagged parse at
/// the boundary. `Entries` is the current export format; `Legacy` is the
/// old raw id -> status object, kept importable on purpose.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Entries(Vec<ImportRecord>),
    Legacy(StatusMap),
}

/// Import rows only need id + status; the denormalized code/name columns
/// of export files are ignored.
#[derive(Debug, Deserialize)]
struct ImportRecord {
    id: String,
    status: CountryStatus,
}

/// Parse either import shape into the canonical StatusMap. Malformed
/// input fails without producing a partial map.
pub fn parse_snapshot(raw: &str) -> Result<StatusMap, SnapshotError> {
    let payload: ImportPayload = serde_json::from_str(raw)?;
    Ok(match payload {
        ImportPayload::Entries(entries) => entries
            .into_iter()
            .map(|rec| (rec.id, rec.status))
            .collect(),
        ImportPayload::Legacy(map) => map,
    })
}

/// Build export rows, one per StatusMap entry, resolving display metadata
/// from the catalog. Unknown ids keep empty code/name columns rather than
/// dropping the entry.
pub fn export_rows(catalog: &Catalog, statuses: &StatusMap) -> Vec<SnapshotEntry> {
    statuses
        .iter()
        .map(|(id, status)| {
            let country = catalog.get(id);
            SnapshotEntry {
                id: id.clone(),
                code: country.map(|c| c.code.clone()).unwrap_or_default(),
                name: country.map(|c| c.name.clone()).unwrap_or_default(),
                status: *status,
            }
        })
        .collect()
}

/// Default filename for an exported snapshot.
pub fn export_file_name(profile_name: &str) -> String {
    format!("travel-map-{profile_name}.json")
}
