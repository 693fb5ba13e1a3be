//! Integration tests for the member repository.
//!
//! - Create with skills, lookups and listing
//! - Unique email constraint
//! - Case-insensitive skill upsert and delete
//! - Row locking by name
//! - Cascade delete

use assert_matches::assert_matches;
use heist_db::models::member::{CreateMember, Sex, SkillInput};
use heist_db::models::status::MemberStatus;
use heist_db::repositories::MemberRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_member(name: &str, email: &str) -> CreateMember {
    CreateMember {
        name: name.to_string(),
        sex: Sex::F,
        email: email.to_string(),
        main_skill: Some("driving".to_string()),
        status: None,
        skills: vec![SkillInput {
            name: "driving".to_string(),
            level: Some("***".to_string()),
        }],
    }
}

fn levels(skills: &[(&str, &str)]) -> Vec<(String, String)> {
    skills
        .iter()
        .map(|(n, l)| (n.to_string(), l.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find(pool: PgPool) {
    let input = new_member("Tokyo", "tokyo@ag04.com");
    let member = MemberRepo::create(&pool, &input, &levels(&[("driving", "***"), ("combat", "*")]))
        .await
        .unwrap();

    assert_eq!(member.name, "Tokyo");
    assert_eq!(member.sex, Sex::F);
    assert_eq!(member.status, MemberStatus::Available);
    assert_eq!(member.main_skill.as_deref(), Some("driving"));

    let found = MemberRepo::find_by_id(&pool, member.id).await.unwrap().unwrap();
    assert_eq!(found.email, "tokyo@ag04.com");

    let by_email = MemberRepo::find_by_email(&pool, "tokyo@ag04.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, member.id);

    let skills = MemberRepo::list_skills(&pool, member.id).await.unwrap();
    let pairs: Vec<_> = skills.iter().map(|s| (s.name.as_str(), s.level.as_str())).collect();
    assert_eq!(pairs, vec![("driving", "***"), ("combat", "*")]);

    assert!(MemberRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_explicit_status(pool: PgPool) {
    let mut input = new_member("Berlin", "berlin@ag04.com");
    input.status = Some(MemberStatus::Retired);
    let member = MemberRepo::create(&pool, &input, &[]).await.unwrap();
    assert_eq!(member.status, MemberStatus::Retired);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    MemberRepo::create(&pool, &new_member("Tokyo", "tokyo@ag04.com"), &[])
        .await
        .unwrap();

    let err = MemberRepo::create(&pool, &new_member("Other", "tokyo@ag04.com"), &[])
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_members_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_create_leaves_nothing_behind(pool: PgPool) {
    // Level longer than ten characters violates the CHECK after the member
    // row is written; the whole create rolls back.
    let result = MemberRepo::create(
        &pool,
        &new_member("Tokyo", "tokyo@ag04.com"),
        &levels(&[("driving", "***********")]),
    )
    .await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));

    assert!(MemberRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_skills_is_case_insensitive(pool: PgPool) {
    let member = MemberRepo::create(
        &pool,
        &new_member("Tokyo", "tokyo@ag04.com"),
        &levels(&[("driving", "*")]),
    )
    .await
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    MemberRepo::upsert_skills(
        &mut tx,
        member.id,
        &levels(&[("DRIVING", "*****"), ("hacking", "**")]),
    )
    .await
    .unwrap();
    MemberRepo::set_main_skill(&mut tx, member.id, "hacking").await.unwrap();
    tx.commit().await.unwrap();

    let skills = MemberRepo::list_skills(&pool, member.id).await.unwrap();
    assert_eq!(skills.len(), 2);
    assert_eq!(skills[0].name, "driving");
    assert_eq!(skills[0].level, "*****");
    assert_eq!(skills[1].name, "hacking");

    let member = MemberRepo::find_by_id(&pool, member.id).await.unwrap().unwrap();
    assert_eq!(member.main_skill.as_deref(), Some("hacking"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_skill_clears_main_skill(pool: PgPool) {
    let member = MemberRepo::create(
        &pool,
        &new_member("Tokyo", "tokyo@ag04.com"),
        &levels(&[("driving", "*"), ("combat", "**")]),
    )
    .await
    .unwrap();

    assert!(MemberRepo::delete_skill(&pool, member.id, "Combat").await.unwrap());
    let after = MemberRepo::find_by_id(&pool, member.id).await.unwrap().unwrap();
    assert_eq!(after.main_skill.as_deref(), Some("driving"));

    assert!(MemberRepo::delete_skill(&pool, member.id, "DRIVING").await.unwrap());
    let after = MemberRepo::find_by_id(&pool, member.id).await.unwrap().unwrap();
    assert_eq!(after.main_skill, None);

    assert!(!MemberRepo::delete_skill(&pool, member.id, "driving").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lock_by_names_returns_all_matches_in_id_order(pool: PgPool) {
    let first = MemberRepo::create(&pool, &new_member("Rio", "rio1@ag04.com"), &[])
        .await
        .unwrap();
    let second = MemberRepo::create(&pool, &new_member("Rio", "rio2@ag04.com"), &[])
        .await
        .unwrap();
    MemberRepo::create(&pool, &new_member("Nairobi", "nairobi@ag04.com"), &[])
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let locked = MemberRepo::lock_by_names(&mut tx, &["Rio", "Nobody"]).await.unwrap();
    tx.rollback().await.unwrap();

    let ids: Vec<_> = locked.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let by_name = MemberRepo::find_by_name(&pool, "Rio").await.unwrap().unwrap();
    assert_eq!(by_name.id, first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_assignable_and_set_status(pool: PgPool) {
    let a = MemberRepo::create(&pool, &new_member("A", "a@ag04.com"), &[])
        .await
        .unwrap();
    let b = MemberRepo::create(&pool, &new_member("B", "b@ag04.com"), &[])
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    MemberRepo::set_status(&mut tx, b.id, MemberStatus::Incarcerated)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let assignable = MemberRepo::list_assignable(&pool).await.unwrap();
    let ids: Vec<_> = assignable.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![a.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_cascades_skills(pool: PgPool) {
    let member = MemberRepo::create(
        &pool,
        &new_member("Tokyo", "tokyo@ag04.com"),
        &levels(&[("driving", "*")]),
    )
    .await
    .unwrap();

    assert!(MemberRepo::hard_delete(&pool, member.id).await.unwrap());
    let orphans = MemberRepo::list_skills_for_members(&pool, &[member.id])
        .await
        .unwrap();
    assert!(orphans.is_empty());
    assert!(!MemberRepo::hard_delete(&pool, member.id).await.unwrap());
}
