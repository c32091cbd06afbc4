//! Mentorship Repository Implementations
//!
//! PostgreSQL implementations of the mentor profile, mentorship request,
//! mentorship message and mentor review repository traits.
//!
//! Accepting and closing requests run in transactions: the status flip and
//! the mentor's mentee_count adjustment commit together, with the capacity
//! guard expressed in the UPDATE's WHERE clause.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    MentorProfile, MentorProfileRepository, MentorReview, MentorReviewRepository,
    MentorshipMessage, MentorshipMessageRepository, MentorshipRequest,
    MentorshipRequestRepository, MentorshipStatus,
};
use crate::shared::error::AppError;

/// Database row representation matching the mentor_profiles table schema.
#[derive(Debug, sqlx::FromRow)]
struct MentorProfileRow {
    id: i64,
    user_id: i64,
    headline: String,
    expertise: Vec<String>,
    capacity: i32,
    mentee_count: i32,
    accepting: bool,
    average_rating: f64,
    review_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MentorProfileRow {
    fn into_profile(self) -> MentorProfile {
        MentorProfile {
            id: self.id,
            user_id: self.user_id,
            headline: self.headline,
            expertise: self.expertise,
            capacity: self.capacity,
            mentee_count: self.mentee_count,
            accepting: self.accepting,
            average_rating: self.average_rating,
            review_count: self.review_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database row representation matching the mentorship_requests table schema.
#[derive(Debug, sqlx::FromRow)]
struct MentorshipRequestRow {
    id: i64,
    mentor_id: i64,
    mentee_id: i64,
    message: Option<String>,
    status: String,
    responded_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MentorshipRequestRow {
    fn into_request(self) -> MentorshipRequest {
        MentorshipRequest {
            id: self.id,
            mentor_id: self.mentor_id,
            mentee_id: self.mentee_id,
            message: self.message,
            status: MentorshipStatus::from_str(&self.status),
            responded_at: self.responded_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MentorshipMessageRow {
    id: i64,
    request_id: i64,
    sender_id: i64,
    body: String,
    created_at: DateTime<Utc>,
}

impl MentorshipMessageRow {
    fn into_message(self) -> MentorshipMessage {
        MentorshipMessage {
            id: self.id,
            request_id: self.request_id,
            sender_id: self.sender_id,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MentorReviewRow {
    id: i64,
    mentor_id: i64,
    mentee_id: i64,
    rating: i16,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl MentorReviewRow {
    fn into_review(self) -> MentorReview {
        MentorReview {
            id: self.id,
            mentor_id: self.mentor_id,
            mentee_id: self.mentee_id,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL mentor profile repository implementation.
#[derive(Clone)]
pub struct PgMentorProfileRepository {
    pool: PgPool,
}

impl PgMentorProfileRepository {
    /// Create a new PgMentorProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MentorProfileRepository for PgMentorProfileRepository {
    /// Find a mentor profile by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<MentorProfile>, AppError> {
        let row = sqlx::query_as::<_, MentorProfileRow>(
            r#"
            SELECT id, user_id, headline, expertise, capacity, mentee_count, accepting,
                   average_rating, review_count, created_at, updated_at
            FROM mentor_profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }

    /// Find the mentor profile owned by a user.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<MentorProfile>, AppError> {
        let row = sqlx::query_as::<_, MentorProfileRow>(
            r#"
            SELECT id, user_id, headline, expertise, capacity, mentee_count, accepting,
                   average_rating, review_count, created_at, updated_at
            FROM mentor_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }

    /// Check whether a user already lists as a mentor.
    async fn exists_for_user(&self, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM mentor_profiles WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// List mentor profiles with keyset pagination, newest first.
    async fn list(&self, after: Option<i64>, limit: i32) -> Result<Vec<MentorProfile>, AppError> {
        let rows = sqlx::query_as::<_, MentorProfileRow>(
            r#"
            SELECT id, user_id, headline, expertise, capacity, mentee_count, accepting,
                   average_rating, review_count, created_at, updated_at
            FROM mentor_profiles
            WHERE $1::BIGINT IS NULL OR id < $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_profile()).collect())
    }

    /// Create a new mentor profile.
    async fn create(&self, profile: &MentorProfile) -> Result<MentorProfile, AppError> {
        let row = sqlx::query_as::<_, MentorProfileRow>(
            r#"
            INSERT INTO mentor_profiles (id, user_id, headline, expertise, capacity, accepting)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, headline, expertise, capacity, mentee_count, accepting,
                      average_rating, review_count, created_at, updated_at
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.headline)
        .bind(&profile.expertise)
        .bind(profile.capacity)
        .bind(profile.accepting)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("User already has a mentor profile".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_profile())
    }

    /// Update headline/expertise/capacity/accepting.
    async fn update(&self, profile: &MentorProfile) -> Result<MentorProfile, AppError> {
        let row = sqlx::query_as::<_, MentorProfileRow>(
            r#"
            UPDATE mentor_profiles
            SET headline = $2,
                expertise = $3,
                capacity = $4,
                accepting = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, headline, expertise, capacity, mentee_count, accepting,
                      average_rating, review_count, created_at, updated_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.headline)
        .bind(&profile.expertise)
        .bind(profile.capacity)
        .bind(profile.accepting)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Mentor profile with id {} not found", profile.id))
        })?;

        Ok(row.into_profile())
    }

    /// Fold one rating into the aggregate atomically.
    async fn apply_review_rating(&self, id: i64, rating: i16) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE mentor_profiles
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
                "Mentor profile with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

/// PostgreSQL mentorship request repository implementation.
#[derive(Clone)]
pub struct PgMentorshipRequestRepository {
    pool: PgPool,
}

impl PgMentorshipRequestRepository {
    /// Create a new PgMentorshipRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MentorshipRequestRepository for PgMentorshipRequestRepository {
    /// Find a request by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<MentorshipRequest>, AppError> {
        let row = sqlx::query_as::<_, MentorshipRequestRow>(
            r#"
            SELECT id, mentor_id, mentee_id, message, status, responded_at,
                   created_at, updated_at
            FROM mentorship_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_request()))
    }

    /// Find the active (pending or accepted) request for a pair, if any.
    async fn find_active_by_pair(
        &self,
        mentor_id: i64,
        mentee_id: i64,
    ) -> Result<Option<MentorshipRequest>, AppError> {
        let row = sqlx::query_as::<_, MentorshipRequestRow>(
            r#"
            SELECT id, mentor_id, mentee_id, message, status, responded_at,
                   created_at, updated_at
            FROM mentorship_requests
            WHERE mentor_id = $1 AND mentee_id = $2 AND status IN ('pending', 'accepted')
            "#,
        )
        .bind(mentor_id)
        .bind(mentee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_request()))
    }

    /// Check whether a pair has a completed mentorship (review eligibility).
    async fn completed_exists(&self, mentor_id: i64, mentee_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM mentorship_requests
                WHERE mentor_id = $1 AND mentee_id = $2 AND status = 'completed'
            )
            "#,
        )
        .bind(mentor_id)
        .bind(mentee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// List requests addressed to a mentor, newest first.
    async fn list_by_mentor(&self, mentor_id: i64) -> Result<Vec<MentorshipRequest>, AppError> {
        let rows = sqlx::query_as::<_, MentorshipRequestRow>(
            r#"
            SELECT id, mentor_id, mentee_id, message, status, responded_at,
                   created_at, updated_at
            FROM mentorship_requests
            WHERE mentor_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(mentor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_request()).collect())
    }

    /// List requests made by a mentee, newest first.
    async fn list_by_mentee(&self, mentee_id: i64) -> Result<Vec<MentorshipRequest>, AppError> {
        let rows = sqlx::query_as::<_, MentorshipRequestRow>(
            r#"
            SELECT id, mentor_id, mentee_id, message, status, responded_at,
                   created_at, updated_at
            FROM mentorship_requests
            WHERE mentee_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(mentee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_request()).collect())
    }

    /// Create a new request.
    async fn create(&self, request: &MentorshipRequest) -> Result<MentorshipRequest, AppError> {
        let row = sqlx::query_as::<_, MentorshipRequestRow>(
            r#"
            INSERT INTO mentorship_requests (id, mentor_id, mentee_id, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, mentor_id, mentee_id, message, status, responded_at,
                      created_at, updated_at
            "#,
        )
        .bind(request.id)
        .bind(request.mentor_id)
        .bind(request.mentee_id)
        .bind(&request.message)
        .bind(request.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_request())
    }

    /// Set a request's status (no capacity side effects).
    async fn update_status(&self, id: i64, status: MentorshipStatus) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE mentorship_requests
            SET status = $2, responded_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Mentorship request with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Atomically accept a pending request.
    ///
    /// The mentee_count increment carries the capacity guard; when it
    /// matches no row the transaction rolls back and false is returned.
    async fn accept(&self, id: i64, mentor_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let incremented = sqlx::query(
            r#"
            UPDATE mentor_profiles
            SET mentee_count = mentee_count + 1, updated_at = NOW()
            WHERE id = $1 AND mentee_count < capacity
            "#,
        )
        .bind(mentor_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if incremented == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let flipped = sqlx::query(
            r#"
            UPDATE mentorship_requests
            SET status = 'accepted', responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped == 0 {
            tx.rollback().await?;
            return Err(AppError::Conflict(
                "Request is no longer pending".to_string(),
            ));
        }

        tx.commit().await?;

        Ok(true)
    }

    /// Atomically close an accepted request and release the mentor slot.
    async fn close_accepted(
        &self,
        id: i64,
        mentor_id: i64,
        status: MentorshipStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let closed = sqlx::query(
            r#"
            UPDATE mentorship_requests
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'accepted'
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if closed == 0 {
            tx.rollback().await?;
            return Err(AppError::Conflict(
                "Request is not in an accepted state".to_string(),
            ));
        }

        sqlx::query(
            r#"
            UPDATE mentor_profiles
            SET mentee_count = GREATEST(mentee_count - 1, 0), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(mentor_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Count completed mentorships run by a mentor.
    async fn count_completed_by_mentor(&self, mentor_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM mentorship_requests
            WHERE mentor_id = $1 AND status = 'completed'
            "#,
        )
        .bind(mentor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

/// PostgreSQL mentorship message repository implementation.
#[derive(Clone)]
pub struct PgMentorshipMessageRepository {
    pool: PgPool,
}

impl PgMentorshipMessageRepository {
    /// Create a new PgMentorshipMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MentorshipMessageRepository for PgMentorshipMessageRepository {
    /// List a request's messages, oldest first, with keyset pagination.
    async fn list_by_request(
        &self,
        request_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<MentorshipMessage>, AppError> {
        let rows = sqlx::query_as::<_, MentorshipMessageRow>(
            r#"
            SELECT id, request_id, sender_id, body, created_at
            FROM mentorship_messages
            WHERE request_id = $1 AND ($2::BIGINT IS NULL OR id > $2)
            ORDER BY id ASC
            LIMIT $3
            "#,
        )
        .bind(request_id)
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }

    /// Create a new message.
    async fn create(&self, message: &MentorshipMessage) -> Result<MentorshipMessage, AppError> {
        let row = sqlx::query_as::<_, MentorshipMessageRow>(
            r#"
            INSERT INTO mentorship_messages (id, request_id, sender_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, request_id, sender_id, body, created_at
            "#,
        )
        .bind(message.id)
        .bind(message.request_id)
        .bind(message.sender_id)
        .bind(&message.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }
}

/// PostgreSQL mentor review repository implementation.
#[derive(Clone)]
pub struct PgMentorReviewRepository {
    pool: PgPool,
}

impl PgMentorReviewRepository {
    /// Create a new PgMentorReviewRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MentorReviewRepository for PgMentorReviewRepository {
    /// Find the unique review for a (mentor, mentee) pair.
    async fn find_by_pair(
        &self,
        mentor_id: i64,
        mentee_id: i64,
    ) -> Result<Option<MentorReview>, AppError> {
        let row = sqlx::query_as::<_, MentorReviewRow>(
            r#"
            SELECT id, mentor_id, mentee_id, rating, comment, created_at
            FROM mentor_reviews
            WHERE mentor_id = $1 AND mentee_id = $2
            "#,
        )
        .bind(mentor_id)
        .bind(mentee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_review()))
    }

    /// List a mentor's reviews, newest first.
    async fn list_by_mentor(&self, mentor_id: i64) -> Result<Vec<MentorReview>, AppError> {
        let rows = sqlx::query_as::<_, MentorReviewRow>(
            r#"
            SELECT id, mentor_id, mentee_id, rating, comment, created_at
            FROM mentor_reviews
            WHERE mentor_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(mentor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_review()).collect())
    }

    /// Create a new review.
    async fn create(&self, review: &MentorReview) -> Result<MentorReview, AppError> {
        let row = sqlx::query_as::<_, MentorReviewRow>(
            r#"
            INSERT INTO mentor_reviews (id, mentor_id, mentee_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, mentor_id, mentee_id, rating, comment, created_at
            "#,
        )
        .bind(review.id)
        .bind(review.mentor_id)
        .bind(review.mentee_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("You have already reviewed this mentor".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_review())
    }
}

