//! Repository for the `members` and `member_skills` tables.

use heist_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member, MemberSkill};
use crate::models::status::MemberStatus;
use crate::DbTransaction;

/// Column list shared across member queries.
const COLUMNS: &str = "id, name, sex, email, main_skill, status_id, created_at, updated_at";

/// Column list shared across member skill queries.
const SKILL_COLUMNS: &str = "id, member_id, name, level, created_at, updated_at";

/// Provides CRUD operations for members and their held skills.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a member and their skills in one transaction.
    ///
    /// `skills` must already carry resolved levels (see
    /// [`heist_core::validation::level_or_default`]).
    pub async fn create(
        pool: &PgPool,
        input: &CreateMember,
        skills: &[(String, String)],
    ) -> Result<Member, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO members (name, sex, email, main_skill, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, Member>(&query)
            .bind(&input.name)
            .bind(input.sex.as_str())
            .bind(&input.email)
            .bind(&input.main_skill)
            .bind(input.status.unwrap_or(MemberStatus::Available).id())
            .fetch_one(&mut *tx)
            .await?;

        for (name, level) in skills {
            sqlx::query("INSERT INTO member_skills (member_id, name, level) VALUES ($1, $2, $3)")
                .bind(member.id)
                .bind(name)
                .bind(level)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(member)
    }

    /// Find a member by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the first member (lowest id) with exactly this name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE name = $1 ORDER BY id LIMIT 1");
        sqlx::query_as::<_, Member>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Find a member by email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE email = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all members ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members ORDER BY id");
        sqlx::query_as::<_, Member>(&query).fetch_all(pool).await
    }

    /// List members whose status allows crew assignment, ordered by id.
    pub async fn list_assignable(pool: &PgPool) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM members WHERE status_id IN ($1, $2) ORDER BY id"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(MemberStatus::Available.id())
            .bind(MemberStatus::Retired.id())
            .fetch_all(pool)
            .await
    }

    /// List the skills of one member in insertion order.
    pub async fn list_skills(pool: &PgPool, member_id: DbId) -> Result<Vec<MemberSkill>, sqlx::Error> {
        let query = format!(
            "SELECT {SKILL_COLUMNS} FROM member_skills WHERE member_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, MemberSkill>(&query)
            .bind(member_id)
            .fetch_all(pool)
            .await
    }

    /// List the skills of several members in one query.
    pub async fn list_skills_for_members(
        pool: &PgPool,
        member_ids: &[DbId],
    ) -> Result<Vec<MemberSkill>, sqlx::Error> {
        let query = format!(
            "SELECT {SKILL_COLUMNS} FROM member_skills WHERE member_id = ANY($1) ORDER BY member_id, id"
        );
        sqlx::query_as::<_, MemberSkill>(&query)
            .bind(member_ids)
            .fetch_all(pool)
            .await
    }

    /// Delete a member. Skills and crew associations cascade.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a skill by case-insensitive name, clearing `main_skill` if it
    /// named that skill. Returns `false` if the member had no such skill.
    pub async fn delete_skill(
        pool: &PgPool,
        member_id: DbId,
        skill_name: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "DELETE FROM member_skills WHERE member_id = $1 AND lower(name) = lower($2)",
        )
        .bind(member_id)
        .bind(skill_name)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE members SET main_skill = NULL
             WHERE id = $1 AND lower(main_skill) = lower($2)",
        )
        .bind(member_id)
        .bind(skill_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped helpers
    // -----------------------------------------------------------------------

    /// Lock a member row for the rest of the transaction.
    pub async fn find_by_id_for_update(
        tx: &mut DbTransaction<'_>,
        id: DbId,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lock every member whose name is in `names`, in id order.
    ///
    /// Several members may share a name; all of them are returned and
    /// locked so callers can pick the first.
    pub async fn lock_by_names(
        tx: &mut DbTransaction<'_>,
        names: &[&str],
    ) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM members WHERE name = ANY($1) ORDER BY id FOR UPDATE"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(names)
            .fetch_all(&mut **tx)
            .await
    }

    /// Skills of several members, read inside the transaction.
    pub async fn skills_for_members_in_tx(
        tx: &mut DbTransaction<'_>,
        member_ids: &[DbId],
    ) -> Result<Vec<MemberSkill>, sqlx::Error> {
        let query = format!(
            "SELECT {SKILL_COLUMNS} FROM member_skills WHERE member_id = ANY($1) ORDER BY member_id, id"
        );
        sqlx::query_as::<_, MemberSkill>(&query)
            .bind(member_ids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert or re-level skills keyed by case-insensitive name.
    pub async fn upsert_skills(
        tx: &mut DbTransaction<'_>,
        member_id: DbId,
        skills: &[(String, String)],
    ) -> Result<(), sqlx::Error> {
        for (name, level) in skills {
            sqlx::query(
                "INSERT INTO member_skills (member_id, name, level) VALUES ($1, $2, $3)
                 ON CONFLICT (member_id, lower(name)) DO UPDATE SET level = EXCLUDED.level",
            )
            .bind(member_id)
            .bind(name)
            .bind(level)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Set `main_skill`.
    pub async fn set_main_skill(
        tx: &mut DbTransaction<'_>,
        member_id: DbId,
        main_skill: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE members SET main_skill = $2 WHERE id = $1")
            .bind(member_id)
            .bind(main_skill)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Overwrite a member's status.
    pub async fn set_status(
        tx: &mut DbTransaction<'_>,
        member_id: DbId,
        status: MemberStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE members SET status_id = $2 WHERE id = $1")
            .bind(member_id)
            .bind(status.id())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
