//! SQLite implementation of LocationRepository.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::params;
use songbook_core::{Location, LocationRepository, NewLocation};

use crate::SharedDatabase;

/// SQLite-backed implementation of LocationRepository.
pub struct SqliteLocationRepository {
    db: SharedDatabase,
}

impl SqliteLocationRepository {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationRepository for SqliteLocationRepository {
    async fn insert_many(&self, user_id: i64, locations: &[NewLocation]) -> Result<usize> {
        let db = self.db.lock().await;

        let inserted = db.transaction(|conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO locations (title, longitude, latitude, population, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for location in locations {
                stmt.execute(params![
                    location.title,
                    location.longitude,
                    location.latitude,
                    location.population,
                    user_id
                ])?;
            }
            Ok(locations.len())
        })?;

        tracing::debug!(
            "[LocationRepository::insert_many] Stored {} locations for user {}",
            inserted,
            user_id
        );
        Ok(inserted)
    }

    async fn list(&self) -> Result<Vec<Location>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let mut stmt = conn.prepare(
            "SELECT id, title, longitude, latitude, population, user_id
             FROM locations
             ORDER BY title ASC, id ASC",
        )?;

        let locations = stmt
            .query_map([], |row| {
                Ok(Location {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    longitude: row.get(2)?,
                    latitude: row.get(3)?,
                    population: row.get(4)?,
                    user_id: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(locations)
    }
}
