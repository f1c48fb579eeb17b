//! Integration tests for loading snapshots from files.

use herakles_thread_inspector::render::{render_thread, render_view};
use herakles_thread_inspector::threads::QUERY_THREADS;
use herakles_thread_inspector::{
    build_view, SnapshotError, SnapshotFetcher, SnapshotSource, StackFrame, ThreadRecord,
    ThreadState,
};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const WORKER_PAYLOAD: &str = r#"[
  {
    "id": 101,
    "name": "20230101_090000_00012_abcd.1.2-3-4",
    "state": "RUNNABLE",
    "lockOwnerId": null,
    "stackTrace": [
      {"className": "com.facebook.presto.operator.Driver", "method": "processInternal", "file": "Driver.java", "line": 373},
      {"className": "com.facebook.presto.operator.Driver", "method": "process", "file": "Driver.java", "line": 282}
    ]
  },
  {
    "id": 57,
    "name": "http-worker-4",
    "state": "BLOCKED",
    "lockOwnerId": 101,
    "stackTrace": [
      {"className": "java.lang.Object", "method": "wait", "file": "Object.java", "line": 502}
    ]
  }
]"#;

fn fetcher_for(file: &NamedTempFile) -> SnapshotFetcher {
    SnapshotFetcher::new(
        SnapshotSource::File(file.path().to_path_buf()),
        Duration::from_secs(1),
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_from_file_and_render() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(WORKER_PAYLOAD.as_bytes()).unwrap();

    let snapshot = fetcher_for(&file).fetch().await.unwrap();
    assert_eq!(snapshot.threads.len(), 2);

    let view = build_view(snapshot.threads);
    assert_eq!(view.selection.group, QUERY_THREADS);

    let text = render_view(&view, snapshot.captured_at).unwrap();
    assert!(text.contains("20230101_090000_00012_abcd.1.2-3-4 RUNNABLE #101\n"));
    assert!(text.contains(
        "  at com.facebook.presto.operator.Driver.processInternal(Driver.java:373)"
    ));
    assert!(!text.contains("http-worker-4 BLOCKED"));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let fetcher = SnapshotFetcher::new(
        SnapshotSource::File("/nonexistent/threads.json".into()),
        Duration::from_secs(1),
    )
    .unwrap();

    let err = fetcher.fetch().await.unwrap_err();
    assert!(matches!(err, SnapshotError::Io { .. }));
}

#[tokio::test]
async fn test_malformed_payload_is_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{\"not\": \"an array\"}").unwrap();

    let err = fetcher_for(&file).fetch().await.unwrap_err();
    assert!(matches!(err, SnapshotError::Parse(_)));
}

#[test]
fn test_render_hand_built_record() {
    let thread = ThreadRecord {
        id: 9,
        name: "Finalizer".to_string(),
        state: ThreadState::Waiting,
        lock_owner_id: None,
        stack_trace: vec![StackFrame {
            class_name: "java.lang.ref.Finalizer$FinalizerThread".to_string(),
            method: "run".to_string(),
            file: "Finalizer.java".to_string(),
            line: 216,
        }],
    };

    let mut out = String::new();
    render_thread(&mut out, &thread);
    assert_eq!(
        out,
        "Finalizer WAITING #9\n  at java.lang.ref.Finalizer$FinalizerThread.run(Finalizer.java:216)\n\n"
    );
}
