//! Song entity

use serde::{Deserialize, Serialize};

/// A song imported from a CSV upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
    /// Uploading user
    pub user_id: i64,
}

/// A song that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
}

impl NewSong {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            year: None,
            genre: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }
}
