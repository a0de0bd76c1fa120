//! Accounts and sessions
//!
//! - Registration and login over the user repository
//! - In-memory cookie sessions
//! - Extractors for the current user

mod extract;
mod service;
mod session;

pub use extract::{CurrentUser, RequireUser};
pub use service::{AuthError, AuthService};
pub use session::{clear_session_cookie, session_cookie, session_token, SessionStore};
