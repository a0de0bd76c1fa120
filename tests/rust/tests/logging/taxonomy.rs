//! Category routing into files

use pretty_assertions::assert_eq;
use songbook_core::{loggers, LogLevel};
use tests::logs::TestLogs;

#[test]
fn test_categories_write_only_their_own_file() {
    let logs = TestLogs::new();

    logs.taxonomy.logger(loggers::REQUEST).info("request line");
    logs.taxonomy.logger(loggers::CSV_UPLOAD).info("upload line");
    logs.taxonomy.logger(loggers::ROOT).warning("root line");

    assert_eq!(logs.lines("request.log").len(), 1);
    assert_eq!(logs.lines("csv_upload.log").len(), 1);
    assert_eq!(logs.lines("app.log").len(), 0);

    // Isolated categories do not reach the root file
    let handler = logs.lines("handler.log");
    assert_eq!(handler.len(), 1);
    assert!(handler[0].contains("[WARNING] root: root line"));
}

#[test]
fn test_database_threshold_is_info() {
    let logs = TestLogs::new();
    let db = logs.taxonomy.logger(loggers::DATABASE);

    assert!(!db.is_enabled_for(LogLevel::Debug));
    assert_eq!(db.debug("dropped"), 0);
    assert_eq!(db.info("kept"), 1);

    let lines = logs.lines("database.log");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("[INFO] database: kept"));
}

#[test]
fn test_line_format() {
    let logs = TestLogs::new();
    logs.taxonomy.logger(loggers::APP).error("something broke");

    let line = logs.lines("app.log").remove(0);
    // YYYY-MM-DD HH:MM:SS,mmm [LEVEL] name: message
    let (timestamp, rest) = line.split_at(23);
    assert_eq!(rest, " [ERROR] app: something broke");
    assert_eq!(&timestamp[4..5], "-");
    assert_eq!(&timestamp[10..11], " ");
    assert_eq!(&timestamp[19..20], ",");
}
