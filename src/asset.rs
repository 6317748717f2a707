//! Bundled model asset and its writable cache copy.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::PunctError;

/// Default location of the bundled model, relative to the working directory.
pub const DEFAULT_ASSET_PATH: &str = "assets/punctuation/model.onnx";

/// Where the packaged model comes from.
#[derive(Debug, Clone)]
pub enum ModelAsset {
    /// A model file shipped next to the application.
    File(PathBuf),
    /// Model bytes embedded in the binary, e.g. with `include_bytes!`.
    Embedded(&'static [u8]),
}

impl Default for ModelAsset {
    fn default() -> Self {
        ModelAsset::File(PathBuf::from(DEFAULT_ASSET_PATH))
    }
}

impl ModelAsset {
    /// Copy the asset to `target` unless a copy already exists there.
    ///
    /// The copy is written to a sibling `.part` file and renamed into place so
    /// an interrupted copy is never mistaken for a cached model.
    pub fn materialize(&self, target: &Path) -> Result<PathBuf, PunctError> {
        if target.exists() {
            log::debug!("Model already cached at {:?}", target);
            return Ok(target.to_path_buf());
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let partial = target.with_extension("onnx.part");
        match self {
            ModelAsset::File(source) => {
                if !source.exists() {
                    return Err(PunctError::AssetNotFound(source.display().to_string()));
                }
                log::info!("Copying model from {:?} to {:?}...", source, target);
                fs::copy(source, &partial)?;
            }
            ModelAsset::Embedded(bytes) => {
                if bytes.is_empty() {
                    return Err(PunctError::AssetNotFound("embedded model is empty".into()));
                }
                log::info!("Writing embedded model ({} bytes) to {:?}...", bytes.len(), target);
                fs::write(&partial, bytes)?;
            }
        }
        fs::rename(&partial, target)?;

        log::info!("Model cached at {:?}", target);
        Ok(target.to_path_buf())
    }
}
