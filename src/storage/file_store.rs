//! 上传文件存储
//!
//! 文件先写入临时文件，再重命名到目标位置，避免读到写了一半的文件。

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{ClassroomError, Result};

#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    /// 保存文件，返回存储句柄
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String>;
    /// 读取文件，不存在时返回 None
    async fn retrieve(&self, handle: &str) -> Result<Option<Vec<u8>>>;
    /// 删除文件，不存在时忽略
    async fn remove(&self, handle: &str) -> Result<()>;
}

/// 本地目录存储，句柄为目录下的文件名
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            ClassroomError::file_operation(format!(
                "Failed to create upload directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // 句柄只能是单个文件名
    fn resolve(&self, handle: &str) -> Result<PathBuf> {
        let valid = !handle.is_empty()
            && handle != "."
            && handle != ".."
            && !handle.contains(['/', '\\'])
            && !handle.starts_with('.');
        if !valid {
            return Err(ClassroomError::validation(format!(
                "Invalid file handle: {handle}"
            )));
        }
        Ok(self.root.join(handle))
    }
}

#[async_trait::async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String> {
        let target = self.resolve(suggested_name)?;
        if tokio::fs::try_exists(&target).await? {
            return Err(ClassroomError::file_operation(format!(
                "File already exists: {suggested_name}"
            )));
        }

        let staging = self.root.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&staging, bytes).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(ClassroomError::file_operation(format!(
                "Failed to write upload: {e}"
            )));
        }
        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(ClassroomError::file_operation(format!(
                "Failed to move upload into place: {e}"
            )));
        }

        debug!("Stored file {} ({} bytes)", suggested_name, bytes.len());
        Ok(suggested_name.to_string())
    }

    async fn retrieve(&self, handle: &str) -> Result<Option<Vec<u8>>> {
        let path = match self.resolve(handle) {
            Ok(path) => path,
            Err(_) => return Ok(None),
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, handle: &str) -> Result<()> {
        let path = self.resolve(handle)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("File to remove does not exist: {}", handle);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
