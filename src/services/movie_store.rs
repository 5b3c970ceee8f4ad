// Movie Store - movie CRUD and name search; deleting a movie cascades to its reviews

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    core::MovieId,
    database::MovieReviewDatabase,
    error::{AppError, AppResult},
    models::{CreateMovieRequest, Movie, MovieWithReviews, Review, UpdateMovieRequest},
    services::review_store::{fetch_all_reviews, fetch_reviews_for_movies},
};

pub(crate) fn movie_from_row(row: &SqliteRow) -> Result<Movie, sqlx::Error> {
    Ok(Movie {
        id: row.try_get::<Uuid, _>("id")?.into(),
        name: row.try_get("name")?,
        release_date: row.try_get("release_date")?,
        average_rating: row.try_get("average_rating")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) async fn fetch_movie<'e, E>(executor: E, id: MovieId) -> Result<Option<Movie>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT id, name, release_date, average_rating, created_at, updated_at \
         FROM movies WHERE id = ?",
    )
    .bind(id.value())
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(movie_from_row).transpose()
}

/// Pair each movie with its reviews, keeping both orderings.
fn attach_reviews(movies: Vec<Movie>, reviews: Vec<Review>) -> Vec<MovieWithReviews> {
    let mut by_movie: HashMap<MovieId, Vec<Review>> = HashMap::new();
    for review in reviews {
        by_movie.entry(review.movie).or_default().push(review);
    }

    movies
        .into_iter()
        .map(|movie| {
            let reviews = by_movie.remove(&movie.id).unwrap_or_default();
            MovieWithReviews::new(movie, reviews)
        })
        .collect()
}

#[derive(Clone)]
pub struct MovieStore {
    db: Arc<MovieReviewDatabase>,
}

impl MovieStore {
    pub fn new(db: Arc<MovieReviewDatabase>) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: CreateMovieRequest) -> AppResult<MovieWithReviews> {
        let new_movie = request.validate()?;
        let now = Utc::now();
        let movie = Movie {
            id: MovieId::new(),
            name: new_movie.name,
            release_date: new_movie.release_date,
            average_rating: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO movies (id, name, release_date, average_rating, created_at, updated_at)
             VALUES (?, ?, ?, NULL, ?, ?)",
        )
        .bind(movie.id.value())
        .bind(&movie.name)
        .bind(movie.release_date)
        .bind(movie.created_at)
        .bind(movie.updated_at)
        .execute(&self.db.pool)
        .await?;

        info!("Created movie {} ({})", movie.id, movie.name);
        Ok(MovieWithReviews::new(movie, Vec::new()))
    }

    pub async fn list(&self) -> AppResult<Vec<MovieWithReviews>> {
        let movies = self.all_movies().await?;
        let reviews = fetch_all_reviews(&self.db.pool).await?;
        Ok(attach_reviews(movies, reviews))
    }

    pub async fn get_by_id(&self, id: MovieId) -> AppResult<MovieWithReviews> {
        let movie = fetch_movie(&self.db.pool, id)
            .await?
            .ok_or_else(AppError::movie_not_found)?;
        let reviews = fetch_reviews_for_movies(&self.db.pool, &[id]).await?;
        Ok(MovieWithReviews::new(movie, reviews))
    }

    /// Partial update of name/release date. The average rating is left alone.
    pub async fn update(&self, id: MovieId, request: UpdateMovieRequest) -> AppResult<MovieWithReviews> {
        let changes = request.validate()?;
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let result = sqlx::query(
            "UPDATE movies SET
                name = COALESCE(?, name),
                release_date = COALESCE(?, release_date),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(changes.name.as_deref())
        .bind(changes.release_date)
        .bind(Utc::now())
        .bind(id.value())
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::movie_not_found());
        }

        info!("Updated movie {}", id);
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: MovieId) -> AppResult<()> {
        let mut tx = self.db.begin_transaction().await?;

        let removed_reviews = sqlx::query("DELETE FROM reviews WHERE movie_id = ?")
            .bind(id.value())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id.value())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::movie_not_found());
        }

        tx.commit().await?;

        info!("Deleted movie {} and {} reviews", id, removed_reviews);
        Ok(())
    }

    /// Case-insensitive substring match on the name. An empty term matches everything.
    pub async fn search(&self, term: &str) -> AppResult<Vec<MovieWithReviews>> {
        let needle = term.trim().to_lowercase();

        // Filtered here rather than in SQL: SQLite's lower() only folds ASCII.
        let movies: Vec<Movie> = self
            .all_movies()
            .await?
            .into_iter()
            .filter(|movie| movie.name.to_lowercase().contains(&needle))
            .collect();

        let ids: Vec<MovieId> = movies.iter().map(|movie| movie.id).collect();
        let reviews = fetch_reviews_for_movies(&self.db.pool, &ids).await?;
        Ok(attach_reviews(movies, reviews))
    }

    async fn all_movies(&self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query(
            "SELECT id, name, release_date, average_rating, created_at, updated_at \
             FROM movies ORDER BY rowid",
        )
        .fetch_all(&self.db.pool)
        .await?
        .iter()
        .map(movie_from_row)
        .collect::<Result<Vec<_>, _>>()?;
        Ok(movies)
    }
}
