//! Domain entities

mod location;
mod log_record;
mod song;
mod user;

pub use location::{Location, NewLocation};
pub use log_record::{LogLevel, LogRecord};
pub use song::{NewSong, Song};
pub use user::{is_valid_email, normalize_email, NewUser, User, MIN_PASSWORD_LEN};
