//! Storage for the single current model.
//!
//! Both registries reject models whose feature list differs from
//! [`FEATURE_NAMES`](crate::FEATURE_NAMES) at `put`, so anything `current`
//! returns can be fed pipeline vectors directly.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tempfile::NamedTempFile;
use tracing::info;

use crate::{ModelResult, TrainedModel};

pub const MODEL_FILE_NAME: &str = "model.json";

/// Holder of the current model.  A `put` replaces it wholesale.
pub trait ModelRegistry: Send + Sync {
    /// Store `model` as the current model and return the shared handle.
    fn put(&self, model: TrainedModel) -> ModelResult<Arc<TrainedModel>>;

    /// The current model, or `None` if nothing has been stored.
    fn current(&self) -> ModelResult<Option<Arc<TrainedModel>>>;
}

// ── MemoryModelRegistry ───────────────────────────────────────────────────────

/// In-process registry.  Readers clone the `Arc` and keep using the model
/// they got even if a newer one is stored meanwhile.
#[derive(Debug, Default)]
pub struct MemoryModelRegistry {
    slot: RwLock<Option<Arc<TrainedModel>>>,
}

impl MemoryModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelRegistry for MemoryModelRegistry {
    fn put(&self, model: TrainedModel) -> ModelResult<Arc<TrainedModel>> {
        model.check_pipeline_features()?;
        let model = Arc::new(model);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&model));
        info!(version = model.version(), "model stored in memory");
        Ok(model)
    }

    fn current(&self) -> ModelResult<Option<Arc<TrainedModel>>> {
        Ok(self.slot.read().unwrap_or_else(PoisonError::into_inner).clone())
    }
}

// ── FileModelRegistry ─────────────────────────────────────────────────────────

/// Registry backed by `<dir>/model.json`.
///
/// `put` writes to a temporary file in `dir` and renames it over the
/// artifact, so a concurrent `current` reads either the old or the new model.
#[derive(Debug, Clone)]
pub struct FileModelRegistry {
    dir: PathBuf,
}

impl FileModelRegistry {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> ModelResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE_NAME)
    }
}

impl ModelRegistry for FileModelRegistry {
    fn put(&self, model: TrainedModel) -> ModelResult<Arc<TrainedModel>> {
        model.check_pipeline_features()?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut w = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut w, &model)?;
            w.flush()?;
        }
        tmp.as_file().sync_all()?;
        let path = self.artifact_path();
        tmp.persist(&path)?;

        info!(version = model.version(), path = %path.display(), "model artifact written");
        Ok(Arc::new(model))
    }

    fn current(&self) -> ModelResult<Option<Arc<TrainedModel>>> {
        let bytes = match fs::read(self.artifact_path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let model = TrainedModel::from_json_slice(&bytes)?;
        model.check_pipeline_features()?;
        Ok(Some(Arc::new(model)))
    }
}
