//! `tracing` events reach the category files

use pretty_assertions::assert_eq;
use songbook_web::logging::TaxonomyLayer;
use tests::logs::TestLogs;
use tracing_subscriber::layer::SubscriberExt;

#[test]
fn test_tracing_targets_route_to_categories() {
    let logs = TestLogs::new();
    let subscriber = tracing_subscriber::registry().with(TaxonomyLayer::new(logs.taxonomy.clone()));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "songbook_storage::database", "migrations applied");
        tracing::debug!(target: "songbook_storage::database", "below the database threshold");
        tracing::info!(target: "tower_http::trace::on_response", status = 200, "finished processing request");
        tracing::warn!(target: "csv_upload", "upload rejected");
        tracing::info!(target: "songbook_web::server", "Listening");
        tracing::info!(target: "some_other_crate", "elsewhere");
    });

    let database = logs.lines("database.log");
    assert_eq!(database.len(), 1);
    assert!(database[0].ends_with("[INFO] database: migrations applied"));

    let framework = logs.lines("framework.log");
    assert_eq!(framework.len(), 1);
    assert!(framework[0].ends_with("finished processing request status=200"));

    assert!(logs.lines("csv_upload.log")[0].contains("[WARNING] csv_upload: upload rejected"));
    assert!(logs.lines("app.log")[0].ends_with("app: Listening"));
    assert!(logs.lines("handler.log")[0].ends_with("root: elsewhere"));
}
