//! Repository for the `tracking_data` table (tracking rooms).

use sqlx::{PgConnection, PgPool};
use workout_core::types::{DbId, Timestamp};

use crate::models::tracking::{
    CreateMapPoint, CreateTrackingData, MapPoint, TrackingData, TrackingSnapshot, TrackingSummary,
    UpdateTrackingData,
};
use crate::repositories::MapPointRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, exercise_id, description, duration, is_new_set, is_new_record, \
                        distance_covered, created_at, last_updated_at";

/// Provides tracking-room persistence: creation, partial aggregate updates,
/// snapshots and per-message ping recording.
pub struct TrackingDataRepo;

impl TrackingDataRepo {
    /// Open a tracking room on `exercise_id`. Both timestamps are set to `now`.
    pub async fn create(
        pool: &PgPool,
        exercise_id: DbId,
        input: &CreateTrackingData,
        now: Timestamp,
    ) -> Result<TrackingData, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracking_data (exercise_id, description, duration, created_at, last_updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackingData>(&query)
            .bind(exercise_id)
            .bind(&input.description)
            .bind(input.duration)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a tracking room by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TrackingData>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracking_data WHERE id = $1");
        sqlx::query_as::<_, TrackingData>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rooms of an exercise, without routes, oldest first.
    pub async fn list_by_exercise(
        pool: &PgPool,
        exercise_id: DbId,
    ) -> Result<Vec<TrackingSummary>, sqlx::Error> {
        sqlx::query_as::<_, TrackingSummary>(
            "SELECT id, description, exercise_id, duration, distance_covered, created_at
             FROM tracking_data WHERE exercise_id = $1 ORDER BY id ASC",
        )
        .bind(exercise_id)
        .fetch_all(pool)
        .await
    }

    /// Apply the `Some` fields of `input` and bump `last_updated_at`.
    ///
    /// Returns `None` if no room with the given `id` exists.
    pub async fn update_aggregates(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrackingData,
        now: Timestamp,
    ) -> Result<Option<TrackingData>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::update_aggregates_inner(&mut conn, id, input, now).await
    }

    /// The room plus its full route, oldest point first.
    ///
    /// Returns `None` if no room with the given `id` exists.
    pub async fn snapshot(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TrackingSnapshot>, sqlx::Error> {
        let mut conn = pool.acquire().await?;

        let query = format!("SELECT {COLUMNS} FROM tracking_data WHERE id = $1");
        let Some(data) = sqlx::query_as::<_, TrackingData>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        let route = MapPointRepo::list_route_inner(&mut conn, id).await?;
        Ok(Some(TrackingSnapshot::new(data, route)))
    }

    /// Persist one live-tracking message as a single unit of work: append the
    /// point and, when `update` is given, apply the aggregate update.
    ///
    /// Returns `None` (and persists nothing) when the aggregate update finds
    /// no room. Any error also rolls the whole message back.
    pub async fn record_ping(
        pool: &PgPool,
        id: DbId,
        point: &CreateMapPoint,
        update: Option<&UpdateTrackingData>,
        now: Timestamp,
    ) -> Result<Option<MapPoint>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let map_point = MapPointRepo::append_inner(&mut tx, id, point, now).await?;

        if let Some(update) = update {
            let updated = Self::update_aggregates_inner(&mut tx, id, update, now).await?;
            if updated.is_none() {
                tx.rollback().await?;
                return Ok(None);
            }
        }

        tx.commit().await?;
        Ok(Some(map_point))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn update_aggregates_inner(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateTrackingData,
        now: Timestamp,
    ) -> Result<Option<TrackingData>, sqlx::Error> {
        let query = format!(
            "UPDATE tracking_data SET
                duration = COALESCE($2, duration),
                is_new_set = COALESCE($3, is_new_set),
                is_new_record = COALESCE($4, is_new_record),
                distance_covered = COALESCE($5, distance_covered),
                last_updated_at = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackingData>(&query)
            .bind(id)
            .bind(input.duration)
            .bind(input.is_new_set)
            .bind(input.is_new_record)
            .bind(input.distance_covered)
            .bind(now)
            .fetch_optional(&mut *conn)
            .await
    }
}
