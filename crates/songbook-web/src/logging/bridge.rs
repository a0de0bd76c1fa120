//! Tracing bridge
//!
//! A `tracing_subscriber` layer that forwards ordinary `tracing` events into
//! the logger taxonomy, choosing the logical logger from the event target.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use songbook_core::{loggers, LogLevel, LogRecord, LoggerTaxonomy};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Crate prefix → logical logger. First match wins.
const TARGET_ROUTES: &[(&str, &str)] = &[
    ("tower_http", loggers::FRAMEWORK),
    ("axum", loggers::FRAMEWORK),
    ("hyper", loggers::FRAMEWORK),
    ("hyper_util", loggers::FRAMEWORK),
    ("songbook_storage", loggers::DATABASE),
    ("rusqlite", loggers::DATABASE),
    ("songbook", loggers::APP),
    ("songbook_core", loggers::APP),
    ("songbook_web", loggers::APP),
];

/// Logical names accepted verbatim as targets, e.g. `info!(target: "csv_upload", ...)`
const LOGICAL_NAMES: &[&str] = &[
    loggers::ROOT,
    loggers::APP,
    loggers::REQUEST,
    loggers::ERRORS,
    loggers::DATABASE,
    loggers::FRAMEWORK,
    loggers::CSV_UPLOAD,
];

/// `target` is `krate` itself or a module inside it
fn in_crate(target: &str, krate: &str) -> bool {
    target == krate
        || target
            .strip_prefix(krate)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Logical logger for an event target.
///
/// Logical names (and their dotted children) map to themselves; known crates
/// map to their category; anything else goes to root.
pub fn logger_for_target(target: &str) -> &str {
    let logical = LOGICAL_NAMES.iter().any(|name| {
        target == *name
            || target
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('.'))
    });
    if logical {
        return target;
    }

    TARGET_ROUTES
        .iter()
        .find(|(krate, _)| in_crate(target, krate))
        .map(|(_, logger)| *logger)
        .unwrap_or(loggers::ROOT)
}

/// Collects the `message` field and appends other fields as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}

/// Layer dispatching events into a [`LoggerTaxonomy`]
pub struct TaxonomyLayer {
    taxonomy: Arc<LoggerTaxonomy>,
}

impl TaxonomyLayer {
    pub fn new(taxonomy: Arc<LoggerTaxonomy>) -> Self {
        Self { taxonomy }
    }
}

impl<S: Subscriber> Layer<S> for TaxonomyLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // TRACE has no counterpart in the taxonomy
        let Some(level) = LogLevel::from_tracing(metadata.level()) else {
            return;
        };

        let logger = logger_for_target(metadata.target());
        if !self.taxonomy.logger(logger).is_enabled_for(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.taxonomy
            .dispatch(&LogRecord::new(level, logger, visitor.finish()));
    }
}
