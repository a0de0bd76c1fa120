//! Map location entity

use serde::{Deserialize, Serialize};

/// A point shown by the map feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub title: String,
    pub longitude: f64,
    pub latitude: f64,
    pub population: Option<i64>,
    pub user_id: i64,
}

/// A location that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub title: String,
    pub longitude: f64,
    pub latitude: f64,
    pub population: Option<i64>,
}

impl NewLocation {
    pub fn new(title: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            title: title.into(),
            longitude,
            latitude,
            population: None,
        }
    }

    pub fn with_population(mut self, population: i64) -> Self {
        self.population = Some(population);
        self
    }
}
