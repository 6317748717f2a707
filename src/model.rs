use std::path::{Path, PathBuf};

use ndarray::{Array2, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;

use crate::asset::ModelAsset;
use crate::LabelModel;

/// Name of the token id input in exported punctuation models.
const INPUT_IDS_NAME: &str = "input_ids";

/// Position of the post-punctuation tensor among the model outputs
/// (pre-punctuation, post-punctuation, capitalization, segmentation).
const POST_PUNCT_OUTPUT: usize = 1;

#[derive(thiserror::Error, Debug)]
pub enum PunctError {
    #[error("ORT error: {0}")]
    Ort(#[from] ort::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ndarray shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("Model asset not found: {0}")]
    AssetNotFound(String),
    #[error("Model input not found: {0}")]
    InputNotFound(String),
    #[error("Model not loaded")]
    ModelNotLoaded,
    #[error("Model output not found: {0}")]
    OutputNotFound(String),
}

/// Parameters for loading the punctuation model.
#[derive(Debug, Clone)]
pub struct PunctModelParams {
    /// Intra-op threads for the ONNX Runtime session.
    pub intra_threads: usize,
    /// File name of the cached copy inside the cache directory.
    pub cache_file_name: String,
}

impl Default for PunctModelParams {
    fn default() -> Self {
        Self {
            intra_threads: 4,
            cache_file_name: "punctuation_model.onnx".to_string(),
        }
    }
}

impl PunctModelParams {
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = threads.max(1);
        self
    }
}

struct LoadedSession {
    session: Session,
    input_name: String,
    output_name: String,
}

/// Token-classification model run through ONNX Runtime.
///
/// The model is copied from its bundled [`ModelAsset`] into `cache_dir` on
/// first initialization and loaded from the cached copy afterwards.
pub struct OnnxPunctModel {
    asset: ModelAsset,
    cache_dir: PathBuf,
    params: PunctModelParams,
    loaded: Option<LoadedSession>,
}

impl OnnxPunctModel {
    /// Create a model handle. Nothing is loaded until [`LabelModel::initialize`].
    pub fn new(asset: ModelAsset, cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_params(asset, cache_dir, PunctModelParams::default())
    }

    pub fn with_params(
        asset: ModelAsset,
        cache_dir: impl Into<PathBuf>,
        params: PunctModelParams,
    ) -> Self {
        Self {
            asset,
            cache_dir: cache_dir.into(),
            params,
            loaded: None,
        }
    }

    /// Path of the cached model copy.
    pub fn cached_model_path(&self) -> PathBuf {
        self.cache_dir.join(&self.params.cache_file_name)
    }

    /// Fallible form of [`LabelModel::initialize`].
    pub fn try_initialize(&mut self) -> Result<(), PunctError> {
        if self.loaded.is_some() {
            return Ok(());
        }

        let model_path = self.asset.materialize(&self.cached_model_path())?;

        log::info!("Loading punctuation model from {:?}...", model_path);
        let session = Self::init_session(&model_path, &self.params)?;

        let input_name = session
            .inputs
            .iter()
            .find(|input| input.name == INPUT_IDS_NAME)
            .or_else(|| session.inputs.first())
            .map(|input| input.name.clone())
            .ok_or_else(|| PunctError::InputNotFound(INPUT_IDS_NAME.to_string()))?;
        let output_name = session
            .outputs
            .get(POST_PUNCT_OUTPUT)
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                PunctError::OutputNotFound(format!(
                    "expected at least {} outputs, model has {}",
                    POST_PUNCT_OUTPUT + 1,
                    session.outputs.len()
                ))
            })?;

        log::info!(
            "Punct model ready: input={}, label output={}",
            input_name,
            output_name
        );

        self.loaded = Some(LoadedSession {
            session,
            input_name,
            output_name,
        });
        Ok(())
    }

    fn init_session(path: &Path, params: &PunctModelParams) -> Result<Session, PunctError> {
        let providers = vec![CPUExecutionProvider::default().build()];

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_execution_providers(providers)?
            .with_intra_threads(params.intra_threads)?
            .commit_from_file(path)?;

        for input in &session.inputs {
            log::info!(
                "Punct model input: name={}, type={:?}",
                input.name,
                input.input_type
            );
        }
        for output in &session.outputs {
            log::info!(
                "Punct model output: name={}, type={:?}",
                output.name,
                output.output_type
            );
        }

        Ok(session)
    }

    /// Fallible form of [`LabelModel::predict`].
    pub fn try_predict(&mut self, input_ids: &[i64]) -> Result<Vec<i64>, PunctError> {
        let loaded = self.loaded.as_mut().ok_or(PunctError::ModelNotLoaded)?;

        let input = Array2::from_shape_vec((1, input_ids.len()), input_ids.to_vec())?;
        let inputs = inputs![
            loaded.input_name.as_str() => TensorRef::from_array_view(input.view())?,
        ];

        let outputs = loaded.session.run(inputs)?;
        let labels = outputs
            .get(loaded.output_name.as_str())
            .ok_or_else(|| PunctError::OutputNotFound(loaded.output_name.clone()))?
            .try_extract_array::<i64>()?;

        if labels.ndim() < 2 || labels.len_of(Axis(0)) == 0 {
            return Err(PunctError::OutputNotFound(format!(
                "unexpected label tensor shape {:?}",
                labels.shape()
            )));
        }

        let row = labels.index_axis(Axis(0), 0);
        Ok(row.iter().copied().collect())
    }
}

impl LabelModel for OnnxPunctModel {
    fn initialize(&mut self) -> bool {
        match self.try_initialize() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to initialize punctuation model: {}", e);
                false
            }
        }
    }

    fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    fn predict(&mut self, input_ids: &[i64]) -> Vec<i64> {
        match self.try_predict(input_ids) {
            Ok(labels) => {
                log::debug!("Predicted {} labels", labels.len());
                labels
            }
            Err(e) => {
                log::warn!("Inference failed, returning no punctuation: {}", e);
                vec![0; input_ids.len()]
            }
        }
    }

    fn close(&mut self) {
        if self.loaded.take().is_some() {
            log::info!("Punctuation model closed");
        }
    }
}

impl Drop for OnnxPunctModel {
    fn drop(&mut self) {
        self.close();
    }
}
