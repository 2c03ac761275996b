use async_trait::async_trait;
use crate::application::errors::CollaboratorError;

/// One item of a folder listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEntry {
    pub name: String,
    pub is_folder: bool,
}

impl DriveEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
        }
    }

    /// Name as shown to the user, folders suffixed with `/`
    pub fn display_name(&self) -> String {
        if self.is_folder {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Drive trait - abstraction for the remote file-storage account
#[async_trait]
pub trait DriveStorage: Send + Sync {
    /// List the direct children of a folder
    async fn list(&self, folder: &str) -> Result<Vec<DriveEntry>, CollaboratorError>;

    /// Delete a file
    async fn delete(&self, path: &str) -> Result<(), CollaboratorError>;

    /// Move a file or folder. A destination that is an existing folder receives the item under its current name.
    async fn move_item(&self, source: &str, destination: &str) -> Result<(), CollaboratorError>;

    /// Rename an item in place
    async fn rename(&self, path: &str, new_name: &str) -> Result<(), CollaboratorError>;

    /// Store `payload` as `folder/filename`, returning the number of bytes written
    /// Store `payload` as `folder/filename`, creating the folder. Never overwrites.
    async fn upload(&self, folder: &str, filename: &str, payload: &[u8]) -> Result<u64, CollaboratorError>;
}
