use skimmer_common::observability::{init_logging, LogConfig};
use tempfile::TempDir;

#[test]
fn init_logging_resolves_path_and_is_idempotent() {
    let tmp = TempDir::new().unwrap();

    let path = init_logging(LogConfig {
        app_name: "skimmer-tests",
        log_dir: Some(tmp.path().to_path_buf()),
        emit_stderr: false,
        json: false,
        default_filter: "debug",
    })
    .expect("first init");

    assert!(path.starts_with(tmp.path()));
    tracing::info!("logging smoke event");

    // A second call must not reinstall the subscriber and hands back the
    // originally resolved path, even with a different config.
    let again = init_logging(LogConfig::default()).expect("second init");
    assert_eq!(path, again);
}
