use crate::errors::AppResult;
use crate::export::model::ExportRow;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use std::fs;
use std::path::Path;

/// Pretty-printed JSON array.
pub(crate) fn export_json<T: ExportRow>(rows: &[T], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(rows)?;
    fs::write(path, json_data)?;

    notify_export_success("JSON", path);
    Ok(())
}

/// RFC 4180 CSV with a header row. Values holding commas, quotes or line
/// breaks are quoted by the writer; embedded quotes are doubled.
pub(crate) fn export_csv<T: ExportRow>(rows: &[T], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)?;
    write_csv(&mut wtr, rows)?;
    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}

/// Shared by the file exporter and in-memory callers.
pub fn write_csv<W: std::io::Write, T: ExportRow>(
    wtr: &mut csv::Writer<W>,
    rows: &[T],
) -> AppResult<()> {
    if rows.is_empty() {
        wtr.write_record(T::headers())?;
    }
    for item in rows {
        wtr.serialize(item)?;
    }
    Ok(())
}
