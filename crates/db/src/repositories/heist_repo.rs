//! Repository for the `heists`, `heist_skills` and `heist_crew` tables.

use heist_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::heist::{CreateHeist, CrewCommitment, Heist, HeistSkill, RequiredSkillInput};
use crate::models::member::Member;
use crate::models::status::HeistStatus;
use crate::DbTransaction;

/// Column list shared across heist queries.
const COLUMNS: &str = "id, name, location, start_time, end_time, status_id, created_at, updated_at";

/// Column list shared across required skill queries.
const SKILL_COLUMNS: &str =
    "id, heist_id, name, level, members, sort_order, created_at, updated_at";

/// Member columns qualified for joins through `heist_crew`.
const CREW_MEMBER_COLUMNS: &str =
    "m.id, m.name, m.sex, m.email, m.main_skill, m.status_id, m.created_at, m.updated_at";

/// Crew rows joined to their heist, as needed for schedule conflict checks.
const COMMITMENT_QUERY: &str = "SELECT c.member_id, h.id AS heist_id, h.status_id, h.start_time, h.end_time \
     FROM heist_crew c \
     JOIN heists h ON h.id = c.heist_id \
     WHERE c.member_id = ANY($1) AND h.status_id = $2 \
     ORDER BY c.member_id, h.id";

/// Provides CRUD operations for heists, their required skills and crews.
pub struct HeistRepo;

impl HeistRepo {
    /// Insert a heist in PLANNING with its required skills, in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateHeist) -> Result<Heist, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO heists (name, location, start_time, end_time, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let heist = sqlx::query_as::<_, Heist>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(HeistStatus::Planning.id())
            .fetch_one(&mut *tx)
            .await?;

        for (i, skill) in input.skills.iter().enumerate() {
            sqlx::query(
                "INSERT INTO heist_skills (heist_id, name, level, members, sort_order)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(heist.id)
            .bind(&skill.name)
            .bind(&skill.level)
            .bind(skill.members)
            .bind(i as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(heist)
    }

    /// Find a heist by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Heist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM heists WHERE id = $1");
        sqlx::query_as::<_, Heist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a heist by its unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Heist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM heists WHERE name = $1");
        sqlx::query_as::<_, Heist>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all heists ordered by start time.
    pub async fn list(pool: &PgPool) -> Result<Vec<Heist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM heists ORDER BY start_time, id");
        sqlx::query_as::<_, Heist>(&query).fetch_all(pool).await
    }

    /// Required skills of one heist in submission order.
    pub async fn list_skills(pool: &PgPool, heist_id: DbId) -> Result<Vec<HeistSkill>, sqlx::Error> {
        let query = format!(
            "SELECT {SKILL_COLUMNS} FROM heist_skills WHERE heist_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, HeistSkill>(&query)
            .bind(heist_id)
            .fetch_all(pool)
            .await
    }

    /// Required skills of several heists in one query.
    pub async fn list_skills_for_heists(
        pool: &PgPool,
        heist_ids: &[DbId],
    ) -> Result<Vec<HeistSkill>, sqlx::Error> {
        let query = format!(
            "SELECT {SKILL_COLUMNS} FROM heist_skills WHERE heist_id = ANY($1) \
             ORDER BY heist_id, sort_order, id"
        );
        sqlx::query_as::<_, HeistSkill>(&query)
            .bind(heist_ids)
            .fetch_all(pool)
            .await
    }

    /// `(heist_id, member_id)` crew pairs for several heists.
    pub async fn list_crew_for_heists(
        pool: &PgPool,
        heist_ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT heist_id, member_id FROM heist_crew WHERE heist_id = ANY($1) \
             ORDER BY heist_id, member_id",
        )
        .bind(heist_ids)
        .fetch_all(pool)
        .await
    }

    /// Crew member ids of one heist.
    pub async fn list_crew_ids(pool: &PgPool, heist_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT member_id FROM heist_crew WHERE heist_id = $1 ORDER BY member_id",
        )
        .bind(heist_id)
        .fetch_all(pool)
        .await
    }

    /// Crew members of one heist.
    pub async fn list_crew_members(pool: &PgPool, heist_id: DbId) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {CREW_MEMBER_COLUMNS} FROM heist_crew c \
             JOIN members m ON m.id = c.member_id \
             WHERE c.heist_id = $1 ORDER BY m.id"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(heist_id)
            .fetch_all(pool)
            .await
    }

    /// Crew entries of `member_ids` on READY heists.
    pub async fn ready_commitments(
        pool: &PgPool,
        member_ids: &[DbId],
    ) -> Result<Vec<CrewCommitment>, sqlx::Error> {
        sqlx::query_as::<_, CrewCommitment>(COMMITMENT_QUERY)
            .bind(member_ids)
            .bind(HeistStatus::Ready.id())
            .fetch_all(pool)
            .await
    }

    /// Move a heist from `from` to `to` only if it is still in `from`.
    ///
    /// Returns `None` when the heist does not exist or has already left
    /// `from`, so two racing callers cannot both apply the transition.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: HeistStatus,
        to: HeistStatus,
    ) -> Result<Option<Heist>, sqlx::Error> {
        let query = format!(
            "UPDATE heists SET status_id = $3 WHERE id = $1 AND status_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Heist>(&query)
            .bind(id)
            .bind(from.id())
            .bind(to.id())
            .fetch_optional(pool)
            .await
    }

    /// Delete a heist. Required skills and crew rows cascade.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM heists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped helpers
    // -----------------------------------------------------------------------

    /// Lock a heist row for the rest of the transaction.
    pub async fn find_by_id_for_update(
        tx: &mut DbTransaction<'_>,
        id: DbId,
    ) -> Result<Option<Heist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM heists WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Heist>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Required skills of one heist, read inside the transaction.
    pub async fn skills_in_tx(
        tx: &mut DbTransaction<'_>,
        heist_id: DbId,
    ) -> Result<Vec<HeistSkill>, sqlx::Error> {
        let query = format!(
            "SELECT {SKILL_COLUMNS} FROM heist_skills WHERE heist_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, HeistSkill>(&query)
            .bind(heist_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Lock and return the crew members of one heist, in id order.
    pub async fn lock_crew_members(
        tx: &mut DbTransaction<'_>,
        heist_id: DbId,
    ) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {CREW_MEMBER_COLUMNS} FROM heist_crew c \
             JOIN members m ON m.id = c.member_id \
             WHERE c.heist_id = $1 ORDER BY m.id \
             FOR UPDATE OF m"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(heist_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// [`Self::ready_commitments`] inside the transaction, so commitments
    /// written by a concurrent confirmation that committed first are seen.
    pub async fn ready_commitments_in_tx(
        tx: &mut DbTransaction<'_>,
        member_ids: &[DbId],
    ) -> Result<Vec<CrewCommitment>, sqlx::Error> {
        sqlx::query_as::<_, CrewCommitment>(COMMITMENT_QUERY)
            .bind(member_ids)
            .bind(HeistStatus::Ready.id())
            .fetch_all(&mut **tx)
            .await
    }

    /// Replace the crew of a heist with exactly `member_ids`.
    pub async fn replace_crew(
        tx: &mut DbTransaction<'_>,
        heist_id: DbId,
        member_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM heist_crew WHERE heist_id = $1")
            .bind(heist_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO heist_crew (heist_id, member_id) \
             SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(heist_id)
        .bind(member_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Overwrite a heist's status and return the updated row.
    pub async fn set_status(
        tx: &mut DbTransaction<'_>,
        heist_id: DbId,
        status: HeistStatus,
    ) -> Result<Heist, sqlx::Error> {
        let query = format!("UPDATE heists SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Heist>(&query)
            .bind(heist_id)
            .bind(status.id())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert required skills, or update `members` on an existing
    /// `(name, level)` pair (case-insensitive). New skills are appended
    /// after the existing ones.
    pub async fn upsert_skills(
        tx: &mut DbTransaction<'_>,
        heist_id: DbId,
        skills: &[RequiredSkillInput],
    ) -> Result<(), sqlx::Error> {
        let next_order: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM heist_skills WHERE heist_id = $1",
        )
        .bind(heist_id)
        .fetch_one(&mut **tx)
        .await?;

        for (i, skill) in skills.iter().enumerate() {
            sqlx::query(
                "INSERT INTO heist_skills (heist_id, name, level, members, sort_order)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (heist_id, lower(name), lower(level))
                 DO UPDATE SET members = EXCLUDED.members",
            )
            .bind(heist_id)
            .bind(&skill.name)
            .bind(&skill.level)
            .bind(skill.members)
            .bind(next_order + i as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Lock heists the sweep may advance at `now`. Rows locked by another
    /// transaction are skipped and picked up on a later sweep.
    pub async fn lock_sweep_candidates(
        tx: &mut DbTransaction<'_>,
        now: Timestamp,
    ) -> Result<Vec<Heist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM heists \
             WHERE (status_id = $1 AND start_time <= $3) \
                OR (status_id = $2 AND end_time <= $3) \
             ORDER BY id \
             FOR UPDATE SKIP LOCKED"
        );
        sqlx::query_as::<_, Heist>(&query)
            .bind(HeistStatus::Planning.id())
            .bind(HeistStatus::InProgress.id())
            .bind(now)
            .fetch_all(&mut **tx)
            .await
    }

    /// Move the given heists from `from` to `to`. Heists no longer in
    /// `from` are left alone. Returns the number of rows changed.
    pub async fn advance_status(
        tx: &mut DbTransaction<'_>,
        heist_ids: &[DbId],
        from: HeistStatus,
        to: HeistStatus,
    ) -> Result<u64, sqlx::Error> {
        if heist_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE heists SET status_id = $3 WHERE id = ANY($1) AND status_id = $2",
        )
        .bind(heist_ids)
        .bind(from.id())
        .bind(to.id())
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
