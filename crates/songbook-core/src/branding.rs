//! Centralized branding constants
//!
//! All product naming and well-known file names come from this module.

/// Human readable product name, used in page titles.
pub const DISPLAY_NAME: &str = "Songbook";

/// Binary / identifier name.
pub const APP_NAME: &str = "songbook";

/// Default directory (relative to the working directory) for log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default SQLite database file name.
pub const DATABASE_FILE: &str = "songbook.db";

/// Default port the web server listens on.
pub const DEFAULT_PORT: u16 = 5000;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "songbook_session";

/// Page title with the product suffix
///
/// # Example
/// ```
/// use songbook_core::branding;
/// assert_eq!(branding::page_title("About"), "About | Songbook");
/// ```
pub fn page_title(page: &str) -> String {
    format!("{} | {}", page, DISPLAY_NAME)
}
