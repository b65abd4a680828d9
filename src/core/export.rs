// EstateHub - core/export.rs
//
// CSV and JSON export of filtered catalog views.
// Core layer: writes to any Write trait object.

use crate::core::model::{Lead, Property, ServiceOffer};
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// A type that can be written as one CSV row.
pub trait CsvRecord {
    fn headers() -> &'static [&'static str];
    fn record(&self) -> Vec<String>;
}

impl CsvRecord for Property {
    fn headers() -> &'static [&'static str] {
        &[
            "id", "title", "price", "location", "bedrooms", "bathrooms", "area", "status",
            "seller_id", "created_at",
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.price.to_string(),
            self.location.clone(),
            self.bedrooms.to_string(),
            self.bathrooms.to_string(),
            self.area.to_string(),
            self.status.as_str().to_string(),
            self.seller_id.clone(),
            self.created_at.to_rfc3339(),
        ]
    }
}

impl CsvRecord for ServiceOffer {
    fn headers() -> &'static [&'static str] {
        &["id", "title", "category", "price", "partner", "created_at"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.category.as_str().to_string(),
            self.price.to_string(),
            self.partner_name.clone(),
            self.created_at.to_rfc3339(),
        ]
    }
}

impl CsvRecord for Lead {
    fn headers() -> &'static [&'static str] {
        &[
            "id", "name", "email", "phone", "location", "temperature", "status", "source",
            "last_interaction",
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.location.clone(),
            self.temperature.as_str().to_string(),
            self.status.as_str().to_string(),
            self.source.clone(),
            self.last_interaction.to_rfc3339(),
        ]
    }
}

/// Export rows to CSV with a header line. Returns the number of rows written.
pub fn export_csv<R: CsvRecord, W: Write>(
    rows: &[&R],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(R::headers()).map_err(csv_err)?;

    let mut count = 0;
    for row in rows {
        csv_writer.write_record(row.record()).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export rows to JSON (array of objects, camelCase keys).
pub fn export_json<T: Serialize, W: Write>(
    rows: &[&T],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(&mut writer, rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(rows.len())
}
