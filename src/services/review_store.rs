// Review Store - review CRUD; every mutation refreshes the owning movie's average in the same transaction

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Executor, QueryBuilder, Row, Sqlite};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    core::{MovieId, ReviewId},
    database::MovieReviewDatabase,
    error::{AppError, AppResult},
    models::{CreateReviewRequest, Movie, Review, ReviewWithMovie, UpdateReviewRequest},
    services::rating_aggregator::refresh_average_rating,
};

const SELECT_REVIEW_WITH_MOVIE: &str = "
    SELECT
        r.id, r.movie_id, r.reviewer_name, r.rating, r.comments, r.created_at, r.updated_at,
        m.name AS movie_name,
        m.release_date AS movie_release_date,
        m.average_rating AS movie_average_rating,
        m.created_at AS movie_created_at,
        m.updated_at AS movie_updated_at
    FROM reviews r
    JOIN movies m ON m.id = r.movie_id
";

pub(crate) fn review_from_row(row: &SqliteRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        id: row.try_get::<Uuid, _>("id")?.into(),
        movie: row.try_get::<Uuid, _>("movie_id")?.into(),
        reviewer_name: row.try_get("reviewer_name")?,
        rating: row.try_get("rating")?,
        comments: row.try_get("comments")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn review_with_movie_from_row(row: &SqliteRow) -> Result<ReviewWithMovie, sqlx::Error> {
    let review = review_from_row(row)?;
    let movie = Movie {
        id: review.movie,
        name: row.try_get("movie_name")?,
        release_date: row.try_get("movie_release_date")?,
        average_rating: row.try_get("movie_average_rating")?,
        created_at: row.try_get("movie_created_at")?,
        updated_at: row.try_get("movie_updated_at")?,
    };
    Ok(review.with_movie(movie))
}

/// Reviews belonging to any of `movie_ids`, oldest first.
pub(crate) async fn fetch_reviews_for_movies<'e, E>(
    executor: E,
    movie_ids: &[MovieId],
) -> Result<Vec<Review>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    if movie_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, movie_id, reviewer_name, rating, comments, created_at, updated_at \
         FROM reviews WHERE movie_id IN (",
    );
    let mut separated = qb.separated(",");
    for id in movie_ids {
        separated.push_bind(id.value());
    }
    qb.push(") ORDER BY rowid");

    qb.build()
        .fetch_all(executor)
        .await?
        .iter()
        .map(review_from_row)
        .collect()
}

/// Every review, oldest first.
pub(crate) async fn fetch_all_reviews<'e, E>(executor: E) -> Result<Vec<Review>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "SELECT id, movie_id, reviewer_name, rating, comments, created_at, updated_at \
         FROM reviews ORDER BY rowid",
    )
    .fetch_all(executor)
    .await?
    .iter()
    .map(review_from_row)
    .collect()
}

#[derive(Clone)]
pub struct ReviewStore {
    db: Arc<MovieReviewDatabase>,
}

impl ReviewStore {
    pub fn new(db: Arc<MovieReviewDatabase>) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: CreateReviewRequest) -> AppResult<Review> {
        let new_review = request.validate()?;
        let now = Utc::now();
        let review = Review {
            id: ReviewId::new(),
            movie: new_review.movie,
            reviewer_name: new_review.reviewer_name,
            rating: new_review.rating,
            comments: new_review.comments,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin_transaction().await?;

        // The SELECT makes the movie check and the insert one statement
        let inserted = sqlx::query(
            "INSERT INTO reviews (id, movie_id, reviewer_name, rating, comments, created_at, updated_at)
             SELECT ?, id, ?, ?, ?, ?, ? FROM movies WHERE id = ?",
        )
        .bind(review.id.value())
        .bind(&review.reviewer_name)
        .bind(review.rating)
        .bind(&review.comments)
        .bind(review.created_at)
        .bind(review.updated_at)
        .bind(review.movie.value())
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(AppError::movie_not_found());
        }

        let average = refresh_average_rating(&mut tx, review.movie).await?;
        tx.commit().await?;

        info!(
            "Created review {} by {} for movie {} (rating {}, average now {:?})",
            review.id,
            review.display_name(),
            review.movie,
            review.rating,
            average
        );
        Ok(review)
    }

    pub async fn list(&self) -> AppResult<Vec<ReviewWithMovie>> {
        let query = format!("{} ORDER BY r.rowid", SELECT_REVIEW_WITH_MOVIE);
        let reviews = sqlx::query(&query)
            .fetch_all(&self.db.pool)
            .await?
            .iter()
            .map(review_with_movie_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }

    pub async fn get_by_id(&self, id: ReviewId) -> AppResult<ReviewWithMovie> {
        let query = format!("{} WHERE r.id = ?", SELECT_REVIEW_WITH_MOVIE);
        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.db.pool)
            .await?;

        match row {
            Some(row) => Ok(review_with_movie_from_row(&row)?),
            None => Err(AppError::review_not_found()),
        }
    }

    pub async fn update(&self, id: ReviewId, request: UpdateReviewRequest) -> AppResult<Review> {
        let changes = request.validate()?;
        let mut tx = self.db.begin_transaction().await?;

        let row = sqlx::query(
            "UPDATE reviews SET
                reviewer_name = CASE WHEN ? THEN ? ELSE reviewer_name END,
                rating = COALESCE(?, rating),
                comments = COALESCE(?, comments),
                updated_at = ?
             WHERE id = ?
             RETURNING id, movie_id, reviewer_name, rating, comments, created_at, updated_at",
        )
        .bind(changes.reviewer_name.is_some())
        .bind(changes.reviewer_name.clone().flatten())
        .bind(changes.rating)
        .bind(changes.comments.as_deref())
        .bind(Utc::now())
        .bind(id.value())
        .fetch_optional(&mut *tx)
        .await?;

        let review = match row {
            Some(row) => review_from_row(&row)?,
            None => return Err(AppError::review_not_found()),
        };

        let average = refresh_average_rating(&mut tx, review.movie).await?;
        tx.commit().await?;

        info!(
            "Updated review {} for movie {} (average now {:?})",
            review.id, review.movie, average
        );
        Ok(review)
    }

    pub async fn delete(&self, id: ReviewId) -> AppResult<()> {
        let mut tx = self.db.begin_transaction().await?;

        let row = sqlx::query("DELETE FROM reviews WHERE id = ? RETURNING movie_id")
            .bind(id.value())
            .fetch_optional(&mut *tx)
            .await?;

        let movie_id = match row {
            Some(row) => MovieId::from(row.try_get::<Uuid, _>("movie_id")?),
            None => return Err(AppError::review_not_found()),
        };

        let average = refresh_average_rating(&mut tx, movie_id).await?;
        tx.commit().await?;

        info!(
            "Deleted review {} from movie {} (average now {:?})",
            id, movie_id, average
        );
        Ok(())
    }
}
