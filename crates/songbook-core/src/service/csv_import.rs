//! CSV import for song and location uploads
//!
//! Header names are matched case-insensitively after trimming. Optional
//! numeric columns that fail to parse are stored as empty.

use std::collections::HashSet;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{NewLocation, NewSong};

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("the file contains no data rows")]
    Empty,

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("unreadable header row: {0}")]
    Header(#[source] csv::Error),

    /// `row` is 1-based and counts data rows only
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: {message}")]
    Invalid { row: usize, message: String },
}

#[derive(Debug, Deserialize)]
struct SongRow {
    #[serde(alias = "name")]
    title: String,
    artist: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    year: Option<i32>,
    #[serde(default)]
    genre: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationRow {
    #[serde(alias = "location")]
    title: String,
    longitude: f64,
    latitude: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    population: Option<i64>,
}

/// Parse `Name,Artist,Year,Genre` rows
pub fn parse_songs<R: Read>(input: R) -> Result<Vec<NewSong>, CsvImportError> {
    let rows: Vec<SongRow> = parse_rows(input, &[&["name", "title"], &["artist"]])?;

    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let title = row.title.trim();
            let artist = row.artist.trim();
            if title.is_empty() || artist.is_empty() {
                return Err(CsvImportError::Invalid {
                    row: idx + 1,
                    message: "name and artist must not be empty".to_string(),
                });
            }
            Ok(NewSong {
                title: title.to_string(),
                artist: artist.to_string(),
                year: row.year,
                genre: row.genre.filter(|g| !g.trim().is_empty()),
            })
        })
        .collect()
}

/// Parse `location,longitude,latitude,population` rows
pub fn parse_locations<R: Read>(input: R) -> Result<Vec<NewLocation>, CsvImportError> {
    let rows: Vec<LocationRow> = parse_rows(
        input,
        &[&["location", "title"], &["longitude"], &["latitude"]],
    )?;

    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let row_no = idx + 1;
            if row.title.trim().is_empty() {
                return Err(CsvImportError::Invalid {
                    row: row_no,
                    message: "location must not be empty".to_string(),
                });
            }
            if !(-180.0..=180.0).contains(&row.longitude) {
                return Err(CsvImportError::Invalid {
                    row: row_no,
                    message: format!("longitude {} out of range", row.longitude),
                });
            }
            if !(-90.0..=90.0).contains(&row.latitude) {
                return Err(CsvImportError::Invalid {
                    row: row_no,
                    message: format!("latitude {} out of range", row.latitude),
                });
            }
            Ok(NewLocation {
                title: row.title.trim().to_string(),
                longitude: row.longitude,
                latitude: row.latitude,
                population: row.population,
            })
        })
        .collect()
}

/// Read, normalize headers, check required columns, deserialize every row.
///
/// Each entry of `required` lists accepted spellings for one column.
fn parse_rows<T, R>(input: R, required: &[&[&'static str]]) -> Result<Vec<T>, CsvImportError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(false)
        .from_reader(input);

    let headers: StringRecord = reader
        .headers()
        .map_err(CsvImportError::Header)?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
        .collect();

    let present: HashSet<&str> = headers.iter().collect();
    for spellings in required {
        if !spellings.iter().any(|s| present.contains(s)) {
            return Err(CsvImportError::MissingColumn(spellings[0]));
        }
    }
    reader.set_headers(headers.clone());

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        let row = result.map_err(|source| CsvImportError::Row {
            row: idx + 1,
            source,
        })?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(CsvImportError::Empty);
    }
    Ok(rows)
}
