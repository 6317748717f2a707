//! Async entry points backed by `tokio::task::spawn_blocking`.
//!
//! Model load and forward passes block for up to hundreds of milliseconds, so
//! they run on the blocking pool instead of an async worker. A task that fails
//! to join degrades like any other failure: `false` for initialization, the
//! original text for punctuation.

use std::sync::Arc;

use crate::restorer::PunctuationRestorer;
use crate::LabelModel;

pub async fn initialize_async<M>(restorer: &Arc<PunctuationRestorer<M>>) -> bool
where
    M: LabelModel + 'static,
{
    let restorer = Arc::clone(restorer);
    match tokio::task::spawn_blocking(move || restorer.initialize()).await {
        Ok(initialized) => initialized,
        Err(e) => {
            log::error!("Punctuation initialization task failed: {}", e);
            false
        }
    }
}

pub async fn add_punctuation_async<M>(restorer: &Arc<PunctuationRestorer<M>>, text: String) -> String
where
    M: LabelModel + 'static,
{
    run_blocking(restorer, text, |restorer, text| restorer.add_punctuation(text)).await
}

pub async fn add_punctuation_to_long_text_async<M>(
    restorer: &Arc<PunctuationRestorer<M>>,
    text: String,
    chunk_size: usize,
) -> String
where
    M: LabelModel + 'static,
{
    run_blocking(restorer, text, move |restorer, text| {
        restorer.add_punctuation_to_long_text(text, chunk_size)
    })
    .await
}

async fn run_blocking<M, F>(restorer: &Arc<PunctuationRestorer<M>>, text: String, f: F) -> String
where
    M: LabelModel + 'static,
    F: FnOnce(&PunctuationRestorer<M>, &str) -> String + Send + 'static,
{
    let restorer = Arc::clone(restorer);
    let fallback = text.clone();
    match tokio::task::spawn_blocking(move || f(&*restorer, text.as_str())).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Punctuation task failed: {}", e);
            fallback
        }
    }
}
