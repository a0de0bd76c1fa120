//! Bootstrap runs once per process

use std::sync::Arc;

use pretty_assertions::assert_eq;
use songbook_core::{loggers, LoggingBootstrap, LoggingConfig, LoggingError};
use tests::logs::read_lines;

#[test]
fn test_second_install_reuses_sinks() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("nested").join("logs");
    let config = LoggingConfig::standard(&log_dir, 10_000_000, 5).without_console();

    let bootstrap = LoggingBootstrap::new();
    let first = bootstrap.install(&config).unwrap();
    let second = bootstrap.install(&config).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(bootstrap.install_count(), 1);
    assert!(log_dir.is_dir());

    first.logger(loggers::APP).info("logged once");
    first.flush();

    let lines = read_lines(&log_dir.join("app.log"));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("[INFO] app: logged once"));
}

#[test]
fn test_concurrent_installs_run_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig::standard(dir.path().join("logs"), 10_000_000, 5).without_console();
    let bootstrap = Arc::new(LoggingBootstrap::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bootstrap = bootstrap.clone();
            let config = config.clone();
            std::thread::spawn(move || bootstrap.install(&config).unwrap())
        })
        .collect();
    let taxonomies: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(bootstrap.install_count(), 1);
    assert!(taxonomies.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_unusable_log_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let config = LoggingConfig::standard(blocker.join("logs"), 10_000_000, 5).without_console();
    let bootstrap = LoggingBootstrap::new();

    let err = bootstrap.install(&config).unwrap_err();
    assert!(matches!(err, LoggingError::CreateDirectory { .. }));
    assert!(!bootstrap.is_installed());
}
