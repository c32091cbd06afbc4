//! Workplace Repository Implementations
//!
//! PostgreSQL implementations of the WorkplaceRepository and
//! WorkplaceReviewRepository traits. Policy tags are stored as a TEXT[]
//! column; unknown values are dropped when mapping rows back to the domain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    PolicyTag, Workplace, WorkplaceRepository, WorkplaceReview, WorkplaceReviewRepository,
};
use crate::shared::error::AppError;

/// Database row representation matching the workplaces table schema.
#[derive(Debug, sqlx::FromRow)]
struct WorkplaceRow {
    id: i64,
    name: String,
    website: Option<String>,
    industry: Option<String>,
    average_rating: f64,
    review_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkplaceRow {
    fn into_workplace(self) -> Workplace {
        Workplace {
            id: self.id,
            name: self.name,
            website: self.website,
            industry: self.industry,
            average_rating: self.average_rating,
            review_count: self.review_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database row representation matching the workplace_reviews table schema.
#[derive(Debug, sqlx::FromRow)]
struct WorkplaceReviewRow {
    id: i64,
    workplace_id: i64,
    author_id: i64,
    rating: i16,
    title: Option<String>,
    body: String,
    policy_tags: Vec<String>,
    employer_reply: Option<String>,
    replied_by: Option<i64>,
    replied_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkplaceReviewRow {
    fn into_review(self) -> WorkplaceReview {
        WorkplaceReview {
            id: self.id,
            workplace_id: self.workplace_id,
            author_id: self.author_id,
            rating: self.rating,
            title: self.title,
            body: self.body,
            policy_tags: self
                .policy_tags
                .iter()
                .filter_map(|t| PolicyTag::from_str(t))
                .collect(),
            employer_reply: self.employer_reply,
            replied_by: self.replied_by,
            replied_at: self.replied_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL workplace repository implementation.
#[derive(Clone)]
pub struct PgWorkplaceRepository {
    pool: PgPool,
}

impl PgWorkplaceRepository {
    /// Create a new PgWorkplaceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkplaceRepository for PgWorkplaceRepository {
    /// Find a workplace by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Workplace>, AppError> {
        let row = sqlx::query_as::<_, WorkplaceRow>(
            r#"
            SELECT id, name, website, industry, average_rating, review_count,
                   created_at, updated_at
            FROM workplaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_workplace()))
    }

    /// Find a workplace by case-insensitive name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Workplace>, AppError> {
        let row = sqlx::query_as::<_, WorkplaceRow>(
            r#"
            SELECT id, name, website, industry, average_rating, review_count,
                   created_at, updated_at
            FROM workplaces
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_workplace()))
    }

    /// List workplaces with keyset pagination, newest first.
    async fn list(&self, after: Option<i64>, limit: i32) -> Result<Vec<Workplace>, AppError> {
        let rows = sqlx::query_as::<_, WorkplaceRow>(
            r#"
            SELECT id, name, website, industry, average_rating, review_count,
                   created_at, updated_at
            FROM workplaces
            WHERE $1::BIGINT IS NULL OR id < $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_workplace()).collect())
    }

    /// Create a new workplace.
    async fn create(&self, workplace: &Workplace) -> Result<Workplace, AppError> {
        let row = sqlx::query_as::<_, WorkplaceRow>(
            r#"
            INSERT INTO workplaces (id, name, website, industry)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, website, industry, average_rating, review_count,
                      created_at, updated_at
            "#,
        )
        .bind(workplace.id)
        .bind(&workplace.name)
        .bind(&workplace.website)
        .bind(&workplace.industry)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("A workplace with this name already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_workplace())
    }

    /// Fold one rating into the aggregate atomically.
    async fn apply_review_rating(&self, id: i64, rating: i16) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE workplaces
            SET average_rating = (average_rating * review_count + $2) / (review_count + 1),
                review_count = review_count + 1,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(f64::from(rating))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Workplace with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Remove one rating from the aggregate, resetting to zero when the
    /// last review goes.
    async fn retract_review_rating(&self, id: i64, rating: i16) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE workplaces
            SET average_rating = CASE
                    WHEN review_count <= 1 THEN 0
                    ELSE (average_rating * review_count - $2) / (review_count - 1)
                END,
                review_count = GREATEST(review_count - 1, 0),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(f64::from(rating))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Workplace with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

/// PostgreSQL workplace review repository implementation.
#[derive(Clone)]
pub struct PgWorkplaceReviewRepository {
    pool: PgPool,
}

impl PgWorkplaceReviewRepository {
    /// Create a new PgWorkplaceReviewRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkplaceReviewRepository for PgWorkplaceReviewRepository {
    /// Find a review by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<WorkplaceReview>, AppError> {
        let row = sqlx::query_as::<_, WorkplaceReviewRow>(
            r#"
            SELECT id, workplace_id, author_id, rating, title, body, policy_tags,
                   employer_reply, replied_by, replied_at, created_at, updated_at
            FROM workplace_reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_review()))
    }

    /// Find the unique review for a (workplace, author) pair.
    async fn find_by_workplace_and_author(
        &self,
        workplace_id: i64,
        author_id: i64,
    ) -> Result<Option<WorkplaceReview>, AppError> {
        let row = sqlx::query_as::<_, WorkplaceReviewRow>(
            r#"
            SELECT id, workplace_id, author_id, rating, title, body, policy_tags,
                   employer_reply, replied_by, replied_at, created_at, updated_at
            FROM workplace_reviews
            WHERE workplace_id = $1 AND author_id = $2
            "#,
        )
        .bind(workplace_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_review()))
    }

    /// List a workplace's reviews, newest first, with keyset pagination.
    async fn list_by_workplace(
        &self,
        workplace_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<WorkplaceReview>, AppError> {
        let rows = sqlx::query_as::<_, WorkplaceReviewRow>(
            r#"
            SELECT id, workplace_id, author_id, rating, title, body, policy_tags,
                   employer_reply, replied_by, replied_at, created_at, updated_at
            FROM workplace_reviews
            WHERE workplace_id = $1 AND ($2::BIGINT IS NULL OR id < $2)
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(workplace_id)
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_review()).collect())
    }

    /// Create a new review.
    async fn create(&self, review: &WorkplaceReview) -> Result<WorkplaceReview, AppError> {
        let tags: Vec<String> = review
            .policy_tags
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();

        let row = sqlx::query_as::<_, WorkplaceReviewRow>(
            r#"
            INSERT INTO workplace_reviews (id, workplace_id, author_id, rating, title, body, policy_tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, workplace_id, author_id, rating, title, body, policy_tags,
                      employer_reply, replied_by, replied_at, created_at, updated_at
            "#,
        )
        .bind(review.id)
        .bind(review.workplace_id)
        .bind(review.author_id)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.body)
        .bind(&tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("You have already reviewed this workplace".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_review())
    }

    /// Attach the employer reply. Only one reply is ever stored.
    async fn set_reply(&self, id: i64, replied_by: i64, reply: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE workplace_reviews
            SET employer_reply = $3, replied_by = $2, replied_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND employer_reply IS NULL
            "#,
        )
        .bind(id)
        .bind(replied_by)
        .bind(reply)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Review already has an employer reply".to_string(),
            ));
        }

        Ok(())
    }

    /// Delete a review.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM workplace_reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Review with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Count reviews written by a user.
    async fn count_by_author(&self, author_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM workplace_reviews WHERE author_id = $1",
        )
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

