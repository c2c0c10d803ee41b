#![allow(dead_code)]

pub use jobdag_test_utils::builders;
pub use jobdag_test_utils::reporter::{RecordingReporter, ReportEvent};
pub use jobdag_test_utils::{init_tracing, with_timeout};

use std::fs;
use std::path::{Path, PathBuf};

use jobdag::dag::Graph;
use jobdag::engine::Dispatch;
use jobdag::exec::{Pool, Slots};

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// A dispatcher over `graph` with `capacity` slots writing captures into
/// `output_dir`, plus a recorder attached to it.
pub fn dispatch(graph: Graph, capacity: usize, output_dir: &Path) -> (Dispatch, RecordingReporter) {
    let recorder = RecordingReporter::new();
    let dispatch = Dispatch::new(graph, Slots::new(capacity).unwrap(), Pool::new(output_dir))
        .with_reporter(Box::new(recorder.clone()));
    (dispatch, recorder)
}
