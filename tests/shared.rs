mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use common::{Calls, MockModel};
use punctuate_rs::{PunctuationRestorer, SharedRestorer};

fn counting_handle(builds: &Arc<AtomicUsize>, calls: &Arc<Calls>) -> SharedRestorer<MockModel> {
    let builds = Arc::clone(builds);
    let calls = Arc::clone(calls);
    SharedRestorer::new(move || {
        builds.fetch_add(1, Ordering::SeqCst);
        PunctuationRestorer::new(MockModel::silent().sharing(&calls))
    })
}

#[test]
fn test_acquire_builds_lazily_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(Calls::default());
    let shared = counting_handle(&builds, &calls);

    assert!(!shared.is_built());
    assert_eq!(builds.load(Ordering::SeqCst), 0);

    let first = shared.acquire();
    let second = shared.acquire();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(shared.is_built());
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_first_acquire_builds_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(Calls::default());
    let shared = Arc::new(counting_handle(&builds, &calls));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                shared.acquire()
            })
        })
        .collect();

    let restorers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(restorers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_punctuation_before_initialize_passes_through() {
    let builds = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(Calls::default());
    let shared = counting_handle(&builds, &calls);

    assert_eq!(shared.add_punctuation("hola mundo"), "hola mundo");
    assert_eq!(calls.predicts(), 0);

    assert!(shared.initialize());
    assert!(shared.initialize());
    assert_eq!(calls.initialize.load(Ordering::SeqCst), 1);
    assert_eq!(shared.add_punctuation("hola mundo"), "Hola mundo.");
    assert_eq!(
        shared.add_punctuation_to_long_text("uno dos tres", 2),
        "Uno dos. Tres."
    );
}

#[test]
fn test_close_releases_and_rebuilds() {
    let builds = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(Calls::default());
    let shared = counting_handle(&builds, &calls);

    assert!(shared.initialize());
    let before = shared.acquire();

    shared.close();
    assert!(!shared.is_built());
    assert!(!before.is_initialized());
    assert_eq!(calls.close.load(Ordering::SeqCst), 1);

    // Closing again without a pipeline is a no-op.
    shared.close();
    assert_eq!(calls.close.load(Ordering::SeqCst), 1);

    let after = shared.acquire();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(!after.is_initialized());
    assert_eq!(builds.load(Ordering::SeqCst), 2);
    assert_eq!(shared.add_punctuation("hola mundo"), "hola mundo");
}

#[test]
fn test_onnx_handle_with_missing_asset() {
    let dir = tempfile::tempdir().unwrap();
    let shared = SharedRestorer::onnx(
        punctuate_rs::ModelAsset::File(dir.path().join("missing.onnx")),
        dir.path().join("cache"),
        punctuate_rs::PunctModelParams::default(),
        punctuate_rs::RestorerParams::default(),
    );

    assert!(!shared.initialize());
    assert_eq!(shared.add_punctuation("hola mundo"), "hola mundo");
    shared.close();
}
