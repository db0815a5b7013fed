//! Snapshot file naming and writing.

use super::SaveError;
use crate::draw::Raster;
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Filename template (chrono format specifiers), without extension.
pub const FILENAME_TEMPLATE: &str = "mouse_track-%Y-%m-%d-%H-%M-%S";

/// Generate the snapshot filename for a given timestamp.
pub fn generate_filename(now: DateTime<Local>) -> String {
    format!("{}.png", now.format(FILENAME_TEMPLATE))
}

/// Make sure `directory` exists.
///
/// With `create_dir` unset a missing directory is reported as
/// [`SaveError::OutputDirectoryMissing`] instead of being created.
pub fn ensure_directory(directory: &Path, create_dir: bool) -> Result<(), SaveError> {
    if directory.is_dir() {
        return Ok(());
    }
    if !create_dir {
        return Err(SaveError::OutputDirectoryMissing(directory.to_path_buf()));
    }

    log::info!("Creating output directory: {}", directory.display());
    fs::create_dir_all(directory)?;
    Ok(())
}

/// Encode `raster` and write it as a new timestamped PNG inside `directory`.
///
/// Saves landing in the same second get a numeric suffix instead of
/// overwriting an earlier file.
pub fn save_png(raster: &Raster, directory: &Path, create_dir: bool) -> Result<PathBuf, SaveError> {
    ensure_directory(directory, create_dir)?;

    let mut encoded = Vec::new();
    raster.write_png(&mut encoded).map_err(|err| match err {
        cairo::IoError::Io(io) => SaveError::Io(io),
        cairo::IoError::Cairo(cairo) => SaveError::Encode(cairo.to_string()),
    })?;

    let filename = generate_filename(Local::now());
    let stem = filename.trim_end_matches(".png");
    let mut attempt = 0u32;
    loop {
        let candidate = if attempt == 0 {
            directory.join(&filename)
        } else {
            directory.join(format!("{stem}-{attempt}.png"))
        };

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(mut file) => {
                if let Err(err) = file.write_all(&encoded).and_then(|_| file.sync_all()) {
                    let _ = fs::remove_file(&candidate);
                    return Err(err.into());
                }
                log::debug!("Snapshot written: {} bytes", encoded.len());
                return Ok(candidate);
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Default output directory: `<pictures>/mousetrack`, falling back to `./out`.
pub fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .map(|dir| dir.join("mousetrack"))
        .unwrap_or_else(|| PathBuf::from("out"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::BLACK;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn filename_uses_padded_timestamp() {
        let when = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(generate_filename(when), "mouse_track-2024-03-07-09-05-01.png");
    }

    #[test]
    fn missing_directory_is_reported_when_creation_disabled() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("absent");
        let raster = Raster::new(2, 2, BLACK);

        let err = save_png(&raster, &target, false).unwrap_err();
        assert!(matches!(err, SaveError::OutputDirectoryMissing(ref p) if p == &target));
        assert!(!target.exists());
    }

    #[test]
    fn same_second_saves_do_not_overwrite() {
        let temp = TempDir::new().unwrap();
        let raster = Raster::new(2, 2, BLACK);

        let first = save_png(&raster, temp.path(), true).unwrap();
        let second = save_png(&raster, temp.path(), true).unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn creates_nested_directory_on_demand() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a").join("b");
        let raster = Raster::new(3, 1, BLACK);

        let path = save_png(&raster, &target, true).unwrap();
        assert_eq!(path.parent(), Some(target.as_path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("mouse_track-"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }
}
