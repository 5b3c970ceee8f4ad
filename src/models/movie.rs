use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::MovieId;
use crate::error::{AppError, AppResult};
use crate::models::review::Review;

/// A persisted movie record. `average_rating` is derived from the movie's
/// reviews and is only ever written by the rating aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: MovieId,
    pub name: String,
    pub release_date: NaiveDate,
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A movie together with its resolved review collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieWithReviews {
    #[serde(flatten)]
    pub movie: Movie,
    pub reviews: Vec<Review>,
}

impl MovieWithReviews {
    pub fn new(movie: Movie, reviews: Vec<Review>) -> Self {
        Self { movie, reviews }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub name: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub name: Option<String>,
    pub release_date: Option<String>,
}

/// Validated input for a new movie.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub name: String,
    pub release_date: NaiveDate,
}

/// Validated partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieChanges {
    pub name: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl MovieChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.release_date.is_none()
    }
}

impl CreateMovieRequest {
    pub fn validate(self) -> AppResult<NewMovie> {
        let name = self
            .name
            .ok_or_else(|| AppError::Validation("name is required".to_string()))?;
        let release_date = self
            .release_date
            .ok_or_else(|| AppError::Validation("releaseDate is required".to_string()))?;

        Ok(NewMovie {
            name: validate_name(&name)?,
            release_date: parse_release_date(&release_date)?,
        })
    }
}

impl UpdateMovieRequest {
    pub fn validate(self) -> AppResult<MovieChanges> {
        Ok(MovieChanges {
            name: self.name.as_deref().map(validate_name).transpose()?,
            release_date: self
                .release_date
                .as_deref()
                .map(parse_release_date)
                .transpose()?,
        })
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp, or a zoneless
/// `YYYY-MM-DDTHH:MM:SS`. Timestamps keep their UTC calendar date.
pub fn parse_release_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation("releaseDate is required".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }

    Err(AppError::Validation(format!(
        "releaseDate must be a date (YYYY-MM-DD), got {:?}",
        raw
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_release_date_formats() {
        assert_eq!(parse_release_date("1999-03-31").unwrap(), date(1999, 3, 31));
        assert_eq!(
            parse_release_date("1999-03-31T00:00:00.000Z").unwrap(),
            date(1999, 3, 31)
        );
        assert_eq!(
            parse_release_date("1999-03-31T23:30:00-02:00").unwrap(),
            date(1999, 4, 1)
        );
        assert_eq!(
            parse_release_date("1999-03-31T12:00:00").unwrap(),
            date(1999, 3, 31)
        );
    }

    #[test]
    fn test_release_date_rejects_garbage() {
        assert!(parse_release_date("").unwrap_err().is_validation());
        assert!(parse_release_date("next friday").unwrap_err().is_validation());
        assert!(parse_release_date("1999-02-30").unwrap_err().is_validation());
    }

    #[test]
    fn test_create_requires_both_fields() {
        let missing_name = CreateMovieRequest {
            name: None,
            release_date: Some("2010-07-16".into()),
        };
        assert!(missing_name.validate().unwrap_err().is_validation());

        let missing_date = CreateMovieRequest {
            name: Some("Inception".into()),
            release_date: None,
        };
        assert!(missing_date.validate().unwrap_err().is_validation());

        let blank_name = CreateMovieRequest {
            name: Some("   ".into()),
            release_date: Some("2010-07-16".into()),
        };
        assert!(blank_name.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_create_trims_name() {
        let movie = CreateMovieRequest {
            name: Some("  Inception ".into()),
            release_date: Some("2010-07-16".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(movie.name, "Inception");
        assert_eq!(movie.release_date, date(2010, 7, 16));
    }

    #[test]
    fn test_update_is_partial() {
        let changes = UpdateMovieRequest::default().validate().unwrap();
        assert!(changes.is_empty());

        let changes = UpdateMovieRequest {
            name: Some("Heat".into()),
            release_date: None,
        }
        .validate()
        .unwrap();
        assert_eq!(changes.name.as_deref(), Some("Heat"));
        assert!(changes.release_date.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let movie = Movie {
            id: MovieId::new(),
            name: "Heat".into(),
            release_date: date(1995, 12, 15),
            average_rating: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(MovieWithReviews::new(movie.clone(), vec![])).unwrap();
        assert_eq!(json["_id"], movie.id.to_string());
        assert_eq!(json["releaseDate"], "1995-12-15");
        assert!(json["averageRating"].is_null());
        assert_eq!(json["reviews"], serde_json::json!([]));
    }
}
