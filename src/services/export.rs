use crate::error::AppError;
use crate::models::CombinedTable;
use bytes::Bytes;
use moka::sync::Cache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

pub const EXPORT_FILE_NAME: &str = "processed_data.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const EXPORT_DISPOSITION: &str = "attachment; filename=\"processed_data.csv\"";
pub const CSV_HEADER: [&str; 7] = [
    "Name",
    "FirstName",
    "SexRaw",
    "StatusRaw",
    "NormalizedSex",
    "Status",
    "SheetName",
];

/// Writes the combined table as UTF-8 CSV. Nulls become empty fields.
pub fn encode_csv(table: &CombinedTable) -> Result<Bytes, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for row in table {
        writer.write_record([
            row.name.as_str(),
            row.first_name.as_deref().unwrap_or_default(),
            row.sex_raw.as_deref().unwrap_or_default(),
            row.status_raw.as_deref().unwrap_or_default(),
            row.normalized_sex.as_str(),
            row.status.map_or("", |s| s.as_str()),
            row.sheet_name.as_str(),
        ])?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| AppError::Export(format!("Failed to flush CSV: {}", e)))?;
    Ok(Bytes::from(data))
}

/// Content hash of a table, used as its export key.
pub fn export_key(table: &CombinedTable) -> String {
    let mut hasher = DefaultHasher::new();
    table.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Memoized CSV encodings, keyed by table content and bounded by total size.
#[derive(Clone)]
pub struct ExportCache {
    cache: Cache<String, Bytes>,
}

impl ExportCache {
    pub fn new(max_bytes: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .weigher(|_key: &String, data: &Bytes| -> u32 {
                data.len().try_into().unwrap_or(u32::MAX)
            })
            .max_capacity(max_bytes)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns the key and encoding of `table`, encoding it only on a miss.
    pub fn get_or_encode(&self, table: &CombinedTable) -> Result<(String, Bytes), AppError> {
        let key = export_key(table);
        if let Some(data) = self.cache.get(&key) {
            tracing::debug!("Export cache hit for {}", key);
            return Ok((key, data));
        }

        let data = encode_csv(table)?;
        tracing::info!("Encoded {} rows into {}B of CSV (key {})", table.len(), data.len(), key);
        self.cache.insert(key.clone(), data.clone());
        Ok((key, data))
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.cache.get(key)
    }
}
