//! Filesystem-backed drive
//!
//! Maps drive paths such as `/Documents/report.pdf` onto a directory tree under
//! a configured root. Paths that would escape the root are rejected.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use crate::application::errors::CollaboratorError;
use crate::domain::traits::{DriveEntry, DriveStorage};

/// Drive rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalDrive {
    root: PathBuf,
}

impl LocalDrive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if needed
    pub async fn init(&self) -> Result<(), CollaboratorError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a drive path to a location under the root
    fn resolve(&self, path: &str) -> Result<PathBuf, CollaboratorError> {
        let mut resolved = self.root.clone();
        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(CollaboratorError::InvalidPath(path.to_string())),
            }
        }
        Ok(resolved)
    }

    /// Like `resolve`, but refuses the root itself
    fn resolve_item(&self, path: &str) -> Result<PathBuf, CollaboratorError> {
        let resolved = self.resolve(path)?;
        if resolved == self.root {
            return Err(CollaboratorError::InvalidPath(path.to_string()));
        }
        Ok(resolved)
    }
}

/// A bare file name: one normal component, no separators
fn check_name(name: &str) -> Result<(), CollaboratorError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains('/') && !name.contains('\\') => Ok(()),
        _ => Err(CollaboratorError::InvalidPath(name.to_string())),
    }
}

/// In-flight upload written by `upload`
fn is_staging(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".part")
}

async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

async fn metadata(path: &Path, shown: &str) -> Result<std::fs::Metadata, CollaboratorError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CollaboratorError::NotFound(shown.to_string())),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl DriveStorage for LocalDrive {
    async fn list(&self, folder: &str) -> Result<Vec<DriveEntry>, CollaboratorError> {
        let dir = self.resolve(folder)?;
        if !metadata(&dir, folder).await?.is_dir() {
            return Err(CollaboratorError::InvalidPath(format!("{} is not a folder", folder)));
        }

        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(&dir).await?;
        while let Some(item) = reader.next_entry().await? {
            let name = item.file_name().to_string_lossy().into_owned();
            if is_staging(&name) {
                continue;
            }
            let is_folder = item.file_type().await?.is_dir();
            entries.push(DriveEntry { name, is_folder });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn delete(&self, path: &str) -> Result<(), CollaboratorError> {
        let target = self.resolve_item(path)?;
        if metadata(&target, path).await?.is_dir() {
            return Err(CollaboratorError::InvalidPath(format!("{} is a folder", path)));
        }
        tokio::fs::remove_file(&target).await?;
        tracing::info!("Deleted {}", target.display());
        Ok(())
    }

    async fn move_item(&self, source: &str, destination: &str) -> Result<(), CollaboratorError> {
        let from = self.resolve_item(source)?;
        metadata(&from, source).await?;

        let mut to = self.resolve(destination)?;
        if tokio::fs::metadata(&to).await.map(|m| m.is_dir()).unwrap_or(false) {
            if let Some(name) = from.file_name() {
                to.push(name);
            }
        }
        if exists(&to).await {
            return Err(CollaboratorError::AlreadyExists(destination.to_string()));
        }
        if let Some(parent) = to.parent() {
            if !exists(parent).await {
                return Err(CollaboratorError::NotFound(destination.to_string()));
            }
        }

        tokio::fs::rename(&from, &to).await?;
        tracing::info!("Moved {} -> {}", from.display(), to.display());
        Ok(())
    }

    async fn rename(&self, path: &str, new_name: &str) -> Result<(), CollaboratorError> {
        check_name(new_name)?;
        let from = self.resolve_item(path)?;
        metadata(&from, path).await?;

        let to = from.with_file_name(new_name);
        if exists(&to).await {
            return Err(CollaboratorError::AlreadyExists(new_name.to_string()));
        }

        tokio::fs::rename(&from, &to).await?;
        tracing::info!("Renamed {} -> {}", from.display(), to.display());
        Ok(())
    }

    async fn upload(&self, folder: &str, filename: &str, payload: &[u8]) -> Result<u64, CollaboratorError> {
        check_name(filename)?;
        let dir = self.resolve(folder)?;
        tokio::fs::create_dir_all(&dir).await?;

        let target = dir.join(filename);
        if exists(&target).await {
            return Err(CollaboratorError::AlreadyExists(format!(
                "{}/{}",
                folder.trim_end_matches('/'),
                filename
            )));
        }

        // Staged write: the target only ever appears complete
        let staging = dir.join(format!(".{}.{}.part", filename, uuid::Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&staging, payload).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        tokio::fs::rename(&staging, &target).await?;

        tracing::info!("Stored {} ({} bytes)", target.display(), payload.len());
        Ok(payload.len() as u64)
    }
}
