// Rating Aggregator - keeps movies.average_rating equal to the rounded mean of its reviews

use sqlx::{Row, SqliteConnection};
use tracing::{debug, warn};

use crate::core::MovieId;
use crate::error::AppResult;

/// Mean of `ratings` rounded to one decimal place, `None` when there are none.
pub fn average_rating(ratings: &[i64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().sum();
    Some(round_to_tenth(sum as f64 / ratings.len() as f64))
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Recompute and persist the average rating of `movie_id`.
///
/// Must run on the same transaction as the review write that triggered it:
/// that write already holds the SQLite write lock, so no other writer can
/// change this movie's reviews between the read and the update below.
pub async fn refresh_average_rating(
    conn: &mut SqliteConnection,
    movie_id: MovieId,
) -> AppResult<Option<f64>> {
    let ratings: Vec<i64> = sqlx::query("SELECT rating FROM reviews WHERE movie_id = ?")
        .bind(movie_id.value())
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|row| row.try_get::<i64, _>("rating"))
        .collect::<Result<_, _>>()?;

    let average = average_rating(&ratings);

    let result = sqlx::query("UPDATE movies SET average_rating = ? WHERE id = ?")
        .bind(average)
        .bind(movie_id.value())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        warn!("Average rating refresh skipped, movie {} no longer exists", movie_id);
    } else {
        debug!(
            "Movie {} average rating is now {:?} over {} reviews",
            movie_id,
            average,
            ratings.len()
        );
    }

    Ok(average)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_none() {
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn test_simple_means() {
        assert_eq!(average_rating(&[8, 6]), Some(7.0));
        assert_eq!(average_rating(&[8]), Some(8.0));
        assert_eq!(average_rating(&[1, 10]), Some(5.5));
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        // 22 / 3 = 7.333...
        assert_eq!(average_rating(&[7, 7, 8]), Some(7.3));
        // 23 / 3 = 7.666...
        assert_eq!(average_rating(&[7, 8, 8]), Some(7.7));
        // 29 / 4 = 7.25 rounds away from zero
        assert_eq!(average_rating(&[7, 7, 7, 8]), Some(7.3));
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(6.66), 6.7);
        assert_eq!(round_to_tenth(6.64), 6.6);
        assert_eq!(round_to_tenth(10.0), 10.0);
    }
}
