//! SQLite implementation of SongRepository.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::{params, Row};
use songbook_core::{NewSong, Song, SongRepository};

use crate::SharedDatabase;

/// SQLite-backed implementation of SongRepository.
pub struct SqliteSongRepository {
    db: SharedDatabase,
}

impl SqliteSongRepository {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    fn row_to_song(row: &Row<'_>) -> rusqlite::Result<Song> {
        Ok(Song {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            year: row.get(3)?,
            genre: row.get(4)?,
            user_id: row.get(5)?,
        })
    }
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn insert_many(&self, user_id: i64, songs: &[NewSong]) -> Result<usize> {
        let db = self.db.lock().await;

        let inserted = db.transaction(|conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO songs (title, artist, year, genre, user_id) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for song in songs {
                stmt.execute(params![song.title, song.artist, song.year, song.genre, user_id])?;
            }
            Ok(songs.len())
        })?;

        tracing::debug!(
            "[SongRepository::insert_many] Stored {} songs for user {}",
            inserted,
            user_id
        );
        Ok(inserted)
    }

    async fn list_page(&self, page: u32, per_page: u32) -> Result<Vec<Song>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let per_page = i64::from(per_page.max(1));
        let offset = i64::from(page.max(1) - 1) * per_page;

        let mut stmt = conn.prepare(
            "SELECT id, title, artist, year, genre, user_id
             FROM songs
             ORDER BY id DESC
             LIMIT ?1 OFFSET ?2",
        )?;

        let songs = stmt
            .query_map(params![per_page, offset], Self::row_to_song)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(songs)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Song>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let mut stmt = conn.prepare(
            "SELECT id, title, artist, year, genre, user_id
             FROM songs
             WHERE user_id = ?
             ORDER BY id DESC",
        )?;

        let songs = stmt
            .query_map(params![user_id], Self::row_to_song)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(songs)
    }

    async fn count(&self) -> Result<i64> {
        let db = self.db.lock().await;
        let count = db
            .connection()
            .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(count)
    }
}
