use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::OnnxPunctModel;
use crate::reconstruct::reconstruct;
use crate::tokenizer::CharTokenizer;
use crate::LabelModel;

/// Parameters for punctuation restoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorerParams {
    /// Sequence length fed to the model for a single pass.
    pub max_length: usize,
    /// Word count per chunk for [`PunctuationRestorer::add_punctuation_chunked`].
    pub chunk_size: usize,
}

impl Default for RestorerParams {
    fn default() -> Self {
        Self {
            max_length: 128,
            chunk_size: 100,
        }
    }
}

/// Tokenizer, label model and reconstruction wired into one pipeline.
///
/// The restorer is `Sync` and meant to be shared behind an `Arc`. Forward
/// passes are serialized on an internal mutex; tokenization and
/// reconstruction run concurrently.
///
/// [`close`](Self::close) must not be called while other threads are still
/// punctuating through the same restorer.
pub struct PunctuationRestorer<M = OnnxPunctModel> {
    tokenizer: CharTokenizer,
    model: Mutex<M>,
    initialized: AtomicBool,
    params: RestorerParams,
}

impl<M: LabelModel> PunctuationRestorer<M> {
    pub fn new(model: M) -> Self {
        Self::with_params(model, RestorerParams::default())
    }

    pub fn with_params(model: M, params: RestorerParams) -> Self {
        Self {
            tokenizer: CharTokenizer::new(),
            model: Mutex::new(model),
            initialized: AtomicBool::new(false),
            params,
        }
    }

    pub fn params(&self) -> &RestorerParams {
        &self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Load the model. Returns `true` immediately if already initialized.
    pub fn initialize(&self) -> bool {
        if self.is_initialized() {
            log::debug!("Punctuation restorer already initialized");
            return true;
        }

        let mut model = self.lock_model();
        if self.is_initialized() {
            return true;
        }

        log::info!("Initializing punctuation restorer...");
        if !model.initialize() {
            log::error!("Punctuation model failed to load, restorer stays disabled");
            return false;
        }

        self.initialized.store(true, Ordering::Release);
        log::info!("Punctuation restorer initialized");
        true
    }

    /// Punctuate `text` in a single model pass.
    ///
    /// Returns `text` unchanged when the restorer is not initialized or the
    /// text is blank.
    pub fn add_punctuation(&self, text: &str) -> String {
        if !self.is_initialized() {
            log::warn!("Punctuation model not initialized, returning original text");
            return text.to_string();
        }
        if text.trim().is_empty() {
            return text.to_string();
        }

        let tokenized = self.tokenizer.encode(text, self.params.max_length);
        log::debug!(
            "Punctuating {} words ({} tokens)",
            tokenized.original_words.len(),
            tokenized.len_unpadded()
        );

        let predictions = {
            let mut model = self.lock_model();
            // Closed while waiting for the lock.
            if !self.is_initialized() {
                return text.to_string();
            }
            model.predict(&tokenized.input_ids)
        };

        reconstruct(&tokenized.original_words, &predictions)
    }

    /// Punctuate long text in independent chunks of `chunk_size` words.
    ///
    /// Text of at most `chunk_size` words takes the single-pass path. Each
    /// chunk starts a new sentence context, so capitalization and sentence
    /// boundaries do not carry across chunk edges. A `chunk_size` of zero is
    /// treated as one.
    pub fn add_punctuation_to_long_text(&self, text: &str, chunk_size: usize) -> String {
        let chunk_size = chunk_size.max(1);
        let words: Vec<&str> = text.split_whitespace().collect();

        if words.len() <= chunk_size {
            return self.add_punctuation(text);
        }

        log::debug!(
            "Splitting {} words into {} chunks of up to {}",
            words.len(),
            words.len().div_ceil(chunk_size),
            chunk_size
        );

        words
            .chunks(chunk_size)
            .map(|chunk| self.add_punctuation(&chunk.join(" ")))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// [`add_punctuation_to_long_text`](Self::add_punctuation_to_long_text)
    /// with the configured chunk size.
    pub fn add_punctuation_chunked(&self, text: &str) -> String {
        self.add_punctuation_to_long_text(text, self.params.chunk_size)
    }

    /// Release the model. Later calls pass text through until re-initialized.
    pub fn close(&self) {
        let mut model = self.lock_model();
        model.close();
        if self.initialized.swap(false, Ordering::AcqRel) {
            log::info!("Punctuation restorer resources released");
        }
    }

    fn lock_model(&self) -> MutexGuard<'_, M> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
