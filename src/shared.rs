//! Shared restorer handle with lazy construction and explicit teardown.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::asset::ModelAsset;
use crate::model::{OnnxPunctModel, PunctModelParams};
use crate::restorer::{PunctuationRestorer, RestorerParams};
use crate::LabelModel;

type Factory<M> = Box<dyn Fn() -> PunctuationRestorer<M> + Send + Sync>;

/// One restorer shared by every caller that holds this handle.
///
/// The pipeline is built on first [`acquire`](Self::acquire); concurrent
/// first acquisitions build it exactly once. [`close`](Self::close) releases
/// the model and drops the pipeline, and the next acquisition rebuilds it
/// from scratch.
///
/// Construct one handle at application start and pass it (or an `Arc` of it)
/// to whatever needs punctuation.
pub struct SharedRestorer<M = OnnxPunctModel> {
    slot: Mutex<Option<Arc<PunctuationRestorer<M>>>>,
    factory: Factory<M>,
}

impl SharedRestorer<OnnxPunctModel> {
    /// Handle over an ONNX model copied from `asset` into `cache_dir`.
    pub fn onnx(
        asset: ModelAsset,
        cache_dir: impl Into<PathBuf>,
        model_params: PunctModelParams,
        params: RestorerParams,
    ) -> Self {
        let cache_dir = cache_dir.into();
        Self::new(move || {
            let model =
                OnnxPunctModel::with_params(asset.clone(), cache_dir.clone(), model_params.clone());
            PunctuationRestorer::with_params(model, params.clone())
        })
    }
}

impl<M: LabelModel> SharedRestorer<M> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> PunctuationRestorer<M> + Send + Sync + 'static,
    {
        Self {
            slot: Mutex::new(None),
            factory: Box::new(factory),
        }
    }

    /// The shared restorer, building it if none exists.
    pub fn acquire(&self) -> Arc<PunctuationRestorer<M>> {
        let mut slot = self.lock_slot();
        match slot.as_ref() {
            Some(restorer) => Arc::clone(restorer),
            None => {
                log::debug!("Building shared punctuation restorer");
                let restorer = Arc::new((self.factory)());
                *slot = Some(Arc::clone(&restorer));
                restorer
            }
        }
    }

    /// Whether a pipeline is currently built.
    pub fn is_built(&self) -> bool {
        self.lock_slot().is_some()
    }

    pub fn initialize(&self) -> bool {
        self.acquire().initialize()
    }

    pub fn add_punctuation(&self, text: &str) -> String {
        self.acquire().add_punctuation(text)
    }

    pub fn add_punctuation_to_long_text(&self, text: &str, chunk_size: usize) -> String {
        self.acquire().add_punctuation_to_long_text(text, chunk_size)
    }

    /// Release the model and drop the shared pipeline.
    pub fn close(&self) {
        let restorer = self.lock_slot().take();
        if let Some(restorer) = restorer {
            restorer.close();
            log::debug!("Shared punctuation restorer dropped");
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Arc<PunctuationRestorer<M>>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
