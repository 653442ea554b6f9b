//! Handing calendar files to the OS.
//!
//! Sharing opens the file with the system handler, which passes it to the
//! default calendar app. If that fails for any reason other than the user
//! backing out, the file is saved to the export directory instead.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gymcal_core::ics::ICS_MIME_TYPE;
use tracing::{debug, warn};

/// An encoded calendar document plus the names it travels under.
#[derive(Debug, Clone)]
pub struct CalendarFile {
    /// Name used when saving directly
    pub filename: String,
    /// Name used when sharing
    pub share_filename: String,
    /// Message shown alongside a shared file
    pub text: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Shared,
    Saved(PathBuf),
    Cancelled,
}

#[derive(Debug)]
pub enum ShareError {
    Cancelled,
    Failed(String),
}

pub trait ShareTarget {
    fn can_share(&self, file: &CalendarFile) -> bool;

    async fn share(&self, file: &CalendarFile) -> Result<(), ShareError>;
}

/// Shares by writing the file to a staging directory and opening it.
pub struct OsShare {
    staging_dir: PathBuf,
}

impl OsShare {
    pub fn new(staging_dir: PathBuf) -> Self {
        OsShare { staging_dir }
    }
}

/// Without a display server there is nothing to open the file with.
fn has_desktop() -> bool {
    if cfg!(target_os = "linux") {
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
    } else {
        true
    }
}

impl ShareTarget for OsShare {
    fn can_share(&self, file: &CalendarFile) -> bool {
        !file.contents.is_empty() && has_desktop()
    }

    async fn share(&self, file: &CalendarFile) -> Result<(), ShareError> {
        let path = write_file(&self.staging_dir, &file.share_filename, &file.contents)
            .await
            .map_err(|e| ShareError::Failed(e.to_string()))?;

        debug!("{} ({}): {}", file.text, ICS_MIME_TYPE, path.display());

        let opened = tokio::task::spawn_blocking(move || open::that(&path))
            .await
            .map_err(|e| ShareError::Failed(e.to_string()))?;

        match opened {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::Interrupted => Err(ShareError::Cancelled),
            Err(e) => Err(ShareError::Failed(e.to_string())),
        }
    }
}

async fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Could not create {}", dir.display()))?;

    let path = dir.join(name);
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("Could not write {}", path.display()))?;

    Ok(path)
}

/// Save `contents` as `dir/name`, creating the directory if needed.
pub async fn save(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    write_file(dir, name, contents).await
}

/// Share the file if a target is given and accepts it, otherwise save it.
pub async fn deliver<S: ShareTarget>(
    file: &CalendarFile,
    share: Option<&S>,
    save_dir: &Path,
) -> Result<DeliveryOutcome> {
    if let Some(target) = share.filter(|t| t.can_share(file)) {
        match target.share(file).await {
            Ok(()) => return Ok(DeliveryOutcome::Shared),
            Err(ShareError::Cancelled) => return Ok(DeliveryOutcome::Cancelled),
            Err(ShareError::Failed(reason)) => {
                warn!("Share failed, falling back to saving the file: {}", reason);
            }
        }
    }

    let path = save(save_dir, &file.filename, &file.contents).await?;
    Ok(DeliveryOutcome::Saved(path))
}
