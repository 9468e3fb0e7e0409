use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// High-level business logic for the `backup` command.
pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`, optionally as a zip archive.
    /// Returns the path actually written, or `None` if the user declined to
    /// overwrite an existing file.
    pub fn backup(
        pool: &mut DbPool,
        database: &str,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<Option<PathBuf>> {
        let src = Path::new(database);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::not_found("Database", src.display()));
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let target = if compress { dest.with_extension("zip") } else { dest.to_path_buf() };
        if target.exists() && !force && !confirm_overwrite(&target)? {
            warning("Backup cancelled by user.");
            return Ok(None);
        }

        // Flush WAL pages so the copied file is self-contained.
        pool.conn.execute_batch("PRAGMA wal_checkpoint(FULL);").ok();

        if compress {
            compress_into(src, &target)?;
        } else {
            fs::copy(src, &target)?;
        }
        success(format!("Backup created: {}", target.display()));

        ttlog_quiet(
            &pool.conn,
            "backup",
            &target.to_string_lossy(),
            if compress { "Backup created and compressed" } else { "Backup created" },
        );

        Ok(Some(target))
    }
}

fn confirm_overwrite(path: &Path) -> AppResult<bool> {
    warning(format!("The file '{}' already exists.", path.display()));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Write `src` as the single deflated entry of a new zip at `zip_path`.
fn compress_into(src: &Path, zip_path: &Path) -> AppResult<()> {
    let entry = src
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "rworkforce.sqlite".to_string());

    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(entry, options).map_err(io::Error::other)?;
    let mut f = fs::File::open(src)?;
    io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;

    info(format!("Compressed: {}", zip_path.display()));
    Ok(())
}
