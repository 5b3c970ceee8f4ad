use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{MovieId, ReviewId};
use crate::error::{AppError, AppResult};
use crate::models::movie::Movie;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;

/// A persisted review. `movie` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub movie: MovieId,
    pub reviewer_name: Option<String>,
    pub rating: i64,
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review with its owning movie resolved in place of the bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithMovie {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub movie: Movie,
    pub reviewer_name: Option<String>,
    pub rating: i64,
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn with_movie(self, movie: Movie) -> ReviewWithMovie {
        ReviewWithMovie {
            id: self.id,
            movie,
            reviewer_name: self.reviewer_name,
            rating: self.rating,
            comments: self.comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Name to show for this review; blank names are anonymous.
    pub fn display_name(&self) -> &str {
        self.reviewer_name.as_deref().unwrap_or("Anonymous")
    }
}

/// A rating as sent by clients. Form inputs post it as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Number(i64),
    Text(String),
}

impl RatingInput {
    pub fn into_rating(self) -> AppResult<i64> {
        let rating = match self {
            RatingInput::Number(rating) => rating,
            RatingInput::Text(raw) => raw.trim().parse().map_err(|_| {
                AppError::Validation(format!("rating must be a whole number, got {:?}", raw))
            })?,
        };
        validate_rating(rating)
    }
}

impl From<i64> for RatingInput {
    fn from(rating: i64) -> Self {
        RatingInput::Number(rating)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub movie_id: Option<String>,
    pub reviewer_name: Option<String>,
    pub rating: Option<RatingInput>,
    pub comments: Option<String>,
}

/// Body of `PUT /reviews/:id`. Any `movie`/`movieId` field is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub reviewer_name: Option<String>,
    pub rating: Option<RatingInput>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub movie: MovieId,
    pub reviewer_name: Option<String>,
    pub rating: i64,
    pub comments: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewChanges {
    /// `Some(None)` clears the name back to anonymous.
    pub reviewer_name: Option<Option<String>>,
    pub rating: Option<i64>,
    pub comments: Option<String>,
}

impl CreateReviewRequest {
    pub fn validate(self) -> AppResult<NewReview> {
        let movie_id = self
            .movie_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::Validation("movieId is required".to_string()))?;
        // A malformed id cannot name an existing movie.
        let movie = MovieId::parse(&movie_id).ok_or_else(AppError::movie_not_found)?;

        let rating = self
            .rating
            .ok_or_else(|| AppError::Validation("rating is required".to_string()))?;
        let comments = self
            .comments
            .ok_or_else(|| AppError::Validation("comments is required".to_string()))?;

        Ok(NewReview {
            movie,
            reviewer_name: normalize_reviewer_name(self.reviewer_name),
            rating: rating.into_rating()?,
            comments: validate_comments(&comments)?,
        })
    }
}

impl UpdateReviewRequest {
    pub fn validate(self) -> AppResult<ReviewChanges> {
        Ok(ReviewChanges {
            reviewer_name: self
                .reviewer_name
                .map(|name| normalize_reviewer_name(Some(name))),
            rating: self.rating.map(RatingInput::into_rating).transpose()?,
            comments: self.comments.as_deref().map(validate_comments).transpose()?,
        })
    }
}

pub fn validate_rating(rating: i64) -> AppResult<i64> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::Validation(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }
    Ok(rating)
}

fn validate_comments(comments: &str) -> AppResult<String> {
    let trimmed = comments.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("comments must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

fn normalize_reviewer_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i64) -> CreateReviewRequest {
        CreateReviewRequest {
            movie_id: Some(MovieId::new().to_string()),
            reviewer_name: Some("Roger".into()),
            rating: Some(rating.into()),
            comments: Some("Two thumbs up".into()),
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(request(0).validate().unwrap_err().is_validation());
        assert!(request(11).validate().unwrap_err().is_validation());
        assert!(request(-3).validate().unwrap_err().is_validation());
        assert_eq!(request(1).validate().unwrap().rating, 1);
        assert_eq!(request(10).validate().unwrap().rating, 10);
    }

    #[test]
    fn test_required_fields() {
        let mut missing_rating = request(5);
        missing_rating.rating = None;
        assert!(missing_rating.validate().unwrap_err().is_validation());

        let mut blank_comments = request(5);
        blank_comments.comments = Some("  ".into());
        assert!(blank_comments.validate().unwrap_err().is_validation());

        let mut missing_movie = request(5);
        missing_movie.movie_id = None;
        assert!(missing_movie.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_malformed_movie_id_is_not_found() {
        let mut bad_movie = request(5);
        bad_movie.movie_id = Some("not-a-movie".into());
        assert!(bad_movie.validate().unwrap_err().is_not_found());
    }

    #[test]
    fn test_blank_reviewer_is_anonymous() {
        let mut anonymous = request(5);
        anonymous.reviewer_name = Some("   ".into());
        let review = anonymous.validate().unwrap();
        assert_eq!(review.reviewer_name, None);
    }

    #[test]
    fn test_rating_accepts_numeric_strings() {
        let parsed: CreateReviewRequest =
            serde_json::from_str(r#"{"movieId":"x","rating":" 8 ","comments":"ok"}"#).unwrap();
        assert_eq!(parsed.rating, Some(RatingInput::Text(" 8 ".into())));

        let mut from_form = request(5);
        from_form.rating = Some(RatingInput::Text("8".into()));
        assert_eq!(from_form.validate().unwrap().rating, 8);

        for bad in ["eight", "7.5", "", "11"] {
            let mut rejected = request(5);
            rejected.rating = Some(RatingInput::Text(bad.into()));
            assert!(rejected.validate().unwrap_err().is_validation(), "{:?}", bad);
        }
    }

    #[test]
    fn test_update_changes() {
        let changes = UpdateReviewRequest {
            reviewer_name: Some(String::new()),
            rating: Some(RatingInput::Number(9)),
            comments: None,
        }
        .validate()
        .unwrap();
        assert_eq!(changes.reviewer_name, Some(None));
        assert_eq!(changes.rating, Some(9));
        assert!(changes.comments.is_none());

        let out_of_range = UpdateReviewRequest {
            rating: Some(RatingInput::Number(42)),
            ..Default::default()
        };
        assert!(out_of_range.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_display_name() {
        let review = Review {
            id: ReviewId::new(),
            movie: MovieId::new(),
            reviewer_name: None,
            rating: 7,
            comments: "Fine".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(review.display_name(), "Anonymous");
    }
}
