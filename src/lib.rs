//! # punctuate-rs
//!
//! Punctuation and capitalization restoration for raw, unpunctuated text such as
//! the output of an offline speech recognizer.
//!
//! ## Pipeline
//!
//! ```text
//! raw text → CharTokenizer::encode → LabelModel::predict → reconstruct → punctuated text
//! ```
//!
//! - **Tokenizer**: fixed-width character ids framed by BOS/EOS and padded to `max_length`
//! - **Model**: a token-classification ONNX graph emitting one punctuation label per slot
//! - **Reconstruction**: label glyphs appended to the source words, sentence starts capitalized
//! - **Chunking**: long inputs are split into word groups that are punctuated independently
//!
//! Restoration is best effort. Load failures leave the restorer uninitialized and
//! text passes through unchanged; inference failures yield text with no inner
//! punctuation. No error ever reaches the caller of
//! [`PunctuationRestorer::add_punctuation`].
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! punctuate-rs = "0.1"
//! ```
//!
//! ```ignore
//! use punctuate_rs::{ModelAsset, OnnxPunctModel, PunctuationRestorer};
//!
//! let model = OnnxPunctModel::new(
//!     ModelAsset::File("assets/punctuation/model.onnx".into()),
//!     "/var/cache/myapp",
//! );
//! let restorer = PunctuationRestorer::new(model);
//!
//! if restorer.initialize() {
//!     println!("{}", restorer.add_punctuation("hola como estas"));
//! }
//! restorer.close();
//! ```
//!
//! ## Async
//!
//! With the `tokio` feature, [`tasks`] offers `async` entry points that run model
//! load and inference on the blocking thread pool.

pub mod asset;
pub mod labels;
pub mod model;
pub mod reconstruct;
pub mod restorer;
pub mod shared;
pub mod tokenizer;

#[cfg(feature = "tokio")]
pub mod tasks;

pub use asset::ModelAsset;
pub use labels::PunctLabel;
pub use model::{OnnxPunctModel, PunctError, PunctModelParams};
pub use reconstruct::reconstruct;
pub use restorer::{PunctuationRestorer, RestorerParams};
pub use shared::SharedRestorer;
pub use tokenizer::{CharTokenizer, TokenizedResult, Vocabulary};

/// Common interface for sequence-labeling backends.
///
/// Implementations own the loaded model resources. Callers serialize access;
/// [`PunctuationRestorer`] keeps its model behind a mutex.
///
/// None of the methods fail outward: errors are logged and degraded to the
/// documented fallback values.
pub trait LabelModel: Send {
    /// Load the model. Idempotent; returns `false` if loading failed.
    fn initialize(&mut self) -> bool;

    /// Whether a model is currently loaded.
    fn is_loaded(&self) -> bool;

    /// Run one forward pass over a full, padded id sequence.
    ///
    /// Returns one label id per input slot. On failure, returns a sequence of
    /// the same length filled with label 0.
    fn predict(&mut self, input_ids: &[i64]) -> Vec<i64>;

    /// Release the loaded model. Safe to call repeatedly.
    fn close(&mut self);
}
