//! Progress-callback trait for per-output transformation events.
//!
//! A rewrite with several styles makes one model call per style. Inject an
//! [`Arc<dyn TransformProgressCallback>`] via
//! [`crate::config::TransformConfigBuilder::progress_callback`] to hear about
//! each call as it starts and finishes; the CLI drives its spinner this way.
//!
//! # Example
//!
//! ```rust
//! use edgequake_rewrite::{TransformConfig, TransformProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl TransformProgressCallback for CountingCallback {
//!     fn on_output_complete(&self, index: usize, total: usize, text_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("output {index}/{total} done ({text_len} bytes)");
//!     }
//! }
//!
//! let config = TransformConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by [`crate::transform::generate_outputs`] around each model call.
///
/// All methods default to no-ops. `index` is 1-based.
pub trait TransformProgressCallback: Send + Sync {
    /// Called once, before the first model call.
    fn on_transform_start(&self, total_outputs: usize) {
        let _ = total_outputs;
    }

    /// Called just before the request for one output is sent.
    ///
    /// `label` is the output's display style, e.g. `"Formal"` or `"Summary-short"`.
    fn on_output_start(&self, index: usize, total_outputs: usize, label: &str) {
        let _ = (index, total_outputs, label);
    }

    /// Called when one output has been produced.
    fn on_output_complete(&self, index: usize, total_outputs: usize, text_len: usize) {
        let _ = (index, total_outputs, text_len);
    }

    /// Called when one output failed. The action is abandoned afterwards.
    fn on_output_error(&self, index: usize, total_outputs: usize, error: &str) {
        let _ = (index, total_outputs, error);
    }

    /// Called once after every output succeeded.
    fn on_transform_complete(&self, total_outputs: usize) {
        let _ = total_outputs;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TransformProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TransformConfig`].
pub type ProgressCallback = Arc<dyn TransformProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCallback {
        events: Mutex<Vec<String>>,
    }

    impl TransformProgressCallback for RecordingCallback {
        fn on_transform_start(&self, total: usize) {
            self.events.lock().unwrap().push(format!("start {total}"));
        }

        fn on_output_start(&self, index: usize, total: usize, label: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("begin {index}/{total} {label}"));
        }

        fn on_output_error(&self, index: usize, _total: usize, error: &str) {
            self.events.lock().unwrap().push(format!("error {index} {error}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_transform_start(2);
        cb.on_output_start(1, 2, "Formal");
        cb.on_output_complete(1, 2, 10);
        cb.on_output_error(2, 2, "boom");
        cb.on_transform_complete(2);
    }

    #[test]
    fn overridden_methods_receive_events() {
        let cb = RecordingCallback::default();
        cb.on_transform_start(2);
        cb.on_output_start(1, 2, "Casual");
        cb.on_output_complete(1, 2, 5);
        cb.on_output_error(2, 2, "timeout");

        let events = cb.events.lock().unwrap();
        assert_eq!(
            *events,
            vec!["start 2", "begin 1/2 Casual", "error 2 timeout"]
        );
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_transform_start(1);
        cb.on_output_complete(1, 1, 0);
    }
}
