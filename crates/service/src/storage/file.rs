use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::errors::ServiceError;
use crate::storage::json_list_store::DocumentBackend;
use crate::storage::Collection;

/// One `<collection>.json` file per collection under a data directory.
///
/// A read-only instance serves bundled files on hosts whose filesystem
/// cannot be written; every write then fails with `NotConfigured`.
pub struct FileDocuments {
    dir: PathBuf,
    writable: bool,
}

impl FileDocuments {
    pub fn new(dir: impl AsRef<Path>, writable: bool) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), writable }
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.key()))
    }
}

#[async_trait]
impl DocumentBackend for FileDocuments {
    fn name(&self) -> &'static str {
        "file"
    }

    fn ensure_writable(&self) -> Result<(), ServiceError> {
        if self.writable {
            Ok(())
        } else {
            Err(ServiceError::unconfigured())
        }
    }

    async fn load(&self, collection: Collection) -> Result<Option<Vec<u8>>, ServiceError> {
        match fs::read(self.path_for(collection)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::Io(e.to_string())),
        }
    }

    async fn save(&self, collection: Collection, body: Vec<u8>) -> Result<(), ServiceError> {
        self.ensure_writable()?;
        fs::create_dir_all(&self.dir).await.map_err(|e| ServiceError::Io(e.to_string()))?;
        let path = self.path_for(collection);
        // write-then-rename so readers never see a half-written array
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).await.map_err(|e| ServiceError::Io(e.to_string()))?;
        fs::rename(&tmp, &path).await.map_err(|e| ServiceError::Io(e.to_string()))?;
        Ok(())
    }

    /// `<collection>.json.corrupt`, replaced by each later set-aside.
    async fn set_aside(&self, collection: Collection, body: Vec<u8>) -> Result<(), ServiceError> {
        self.ensure_writable()?;
        let path = self.path_for(collection).with_extension("json.corrupt");
        fs::write(&path, body).await.map_err(|e| ServiceError::Io(e.to_string()))?;
        Ok(())
    }
}
