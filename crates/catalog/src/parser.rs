//! Parser for catalog data files.
//!
//! All three files are UTF-8, one record per line, fields separated by `::`:
//! - films.dat: filmId::title::category::releaseYear::durationMinutes::ageRating::rank::imageUrl::trailerUrl::overview
//! - interactions.dat: userId::filmId::timestamp
//! - watchlists.dat: userId::filmId
//!
//! Blank lines and lines starting with `#` are skipped. The film overview is
//! the remainder of the line, so it may contain `::` itself.

use crate::error::{CatalogError, Result};
use crate::types::*;
use std::path::Path;
use std::str::FromStr;

const FILM_FIELDS: usize = 10;
const INTERACTION_FIELDS: usize = 3;
const WATCHLIST_FIELDS: usize = 2;

/// Read a data file into (line number, trimmed line) pairs, skipping
/// blanks and comments.
fn read_records(path: &Path) -> Result<Vec<(usize, String)>> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CatalogError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => CatalogError::IoError(e),
    })?;

    Ok(content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| (line_no, line.to_string()))
        .collect())
}

/// Split a record into exactly `expected` fields; the last field keeps any
/// remaining separators.
fn split_fields<'a>(
    file: &str,
    line_no: usize,
    line: &'a str,
    expected: usize,
) -> Result<Vec<&'a str>> {
    let parts: Vec<&str> = line.splitn(expected, "::").collect();
    if parts.len() != expected {
        return Err(CatalogError::FieldCountMismatch {
            file: file.to_string(),
            expected,
            found: parts.len(),
            line: line_no,
        });
    }
    Ok(parts)
}

fn parse_field<T>(file: &str, line_no: usize, name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| CatalogError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid {}: {}", name, e),
    })
}

fn parse_user_id(file: &str, line_no: usize, raw: &str) -> Result<UserId> {
    let user_id = raw.trim();
    if user_id.is_empty() {
        return Err(CatalogError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing userId".to_string(),
        });
    }
    Ok(user_id.to_string())
}

/// Parse the films.dat file
pub fn parse_films(path: &Path) -> Result<Vec<Film>> {
    const FILE: &str = "films.dat";
    let mut films = Vec::new();

    for (line_no, line) in read_records(path)? {
        let f = split_fields(FILE, line_no, &line, FILM_FIELDS)?;

        let title = f[1].trim();
        if title.is_empty() {
            return Err(CatalogError::InvalidValue {
                field: "title".to_string(),
                value: line.clone(),
            });
        }

        films.push(Film {
            id: parse_field(FILE, line_no, "filmId", f[0])?,
            title: title.to_string(),
            // Empty category allowed
            category: f[2].trim().to_string(),
            release_year: parse_field(FILE, line_no, "releaseYear", f[3])?,
            duration_minutes: parse_field(FILE, line_no, "durationMinutes", f[4])?,
            age_rating: parse_field(FILE, line_no, "ageRating", f[5])?,
            rank: parse_field(FILE, line_no, "rank", f[6])?,
            image_url: f[7].trim().to_string(),
            trailer_url: f[8].trim().to_string(),
            overview: f[9].trim().to_string(),
        });
    }

    Ok(films)
}

/// Parse the interactions.dat file
pub fn parse_interactions(path: &Path) -> Result<Vec<InteractionRecord>> {
    const FILE: &str = "interactions.dat";
    let mut records = Vec::new();

    for (line_no, line) in read_records(path)? {
        let f = split_fields(FILE, line_no, &line, INTERACTION_FIELDS)?;
        records.push(InteractionRecord {
            user_id: parse_user_id(FILE, line_no, f[0])?,
            film_id: parse_field(FILE, line_no, "filmId", f[1])?,
            timestamp: parse_field(FILE, line_no, "timestamp", f[2])?,
        });
    }

    Ok(records)
}

/// Parse the watchlists.dat file
pub fn parse_watchlists(path: &Path) -> Result<Vec<WatchlistEntry>> {
    const FILE: &str = "watchlists.dat";
    let mut entries = Vec::new();

    for (line_no, line) in read_records(path)? {
        let f = split_fields(FILE, line_no, &line, WATCHLIST_FIELDS)?;
        entries.push(WatchlistEntry {
            user_id: parse_user_id(FILE, line_no, f[0])?,
            film_id: parse_field(FILE, line_no, "filmId", f[1])?,
        });
    }

    Ok(entries)
}
