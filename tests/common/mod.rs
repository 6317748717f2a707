#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use punctuate_rs::LabelModel;

/// Call counters shared between a test and its mock model.
#[derive(Default)]
pub struct Calls {
    pub initialize: AtomicUsize,
    pub predict: AtomicUsize,
    pub close: AtomicUsize,
    pub in_flight: AtomicBool,
    pub overlapped: AtomicBool,
}

impl Calls {
    pub fn predicts(&self) -> usize {
        self.predict.load(Ordering::SeqCst)
    }
}

/// Scripted label model.
pub struct MockModel {
    pub calls: Arc<Calls>,
    fail_load: bool,
    labels: Vec<i64>,
    loaded: bool,
}

impl MockModel {
    /// Predicts `labels` (padded with 0 to the input length) for every pass.
    pub fn with_labels(labels: Vec<i64>) -> Self {
        Self {
            calls: Arc::new(Calls::default()),
            fail_load: false,
            labels,
            loaded: false,
        }
    }

    /// Predicts label 0 everywhere, as a failed forward pass does.
    pub fn silent() -> Self {
        Self::with_labels(Vec::new())
    }

    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::silent()
        }
    }

    pub fn sharing(mut self, calls: &Arc<Calls>) -> Self {
        self.calls = Arc::clone(calls);
        self
    }
}

impl LabelModel for MockModel {
    fn initialize(&mut self) -> bool {
        self.calls.initialize.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return false;
        }
        self.loaded = true;
        true
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn predict(&mut self, input_ids: &[i64]) -> Vec<i64> {
        if self.calls.in_flight.swap(true, Ordering::SeqCst) {
            self.calls.overlapped.store(true, Ordering::SeqCst);
        }
        self.calls.predict.fetch_add(1, Ordering::SeqCst);
        std::thread::yield_now();

        let mut out = self.labels.clone();
        out.resize(input_ids.len(), 0);

        self.calls.in_flight.store(false, Ordering::SeqCst);
        out
    }

    fn close(&mut self) {
        self.calls.close.fetch_add(1, Ordering::SeqCst);
        self.loaded = false;
    }
}

/// `count` distinct lowercase words: "w0 w1 w2 ...".
pub fn numbered_words(count: usize) -> String {
    (0..count)
        .map(|i| format!("w{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words of `text` with trailing punctuation removed and case folded.
pub fn bare_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_end_matches(['.', ',', '?', '!', ';', ':', '-'])
                .to_lowercase()
        })
        .collect()
}
