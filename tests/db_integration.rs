//! Database integration tests for the moment store.
//!
//! Each test gets its own in-memory SQLite database with the schema applied.

mod common;

use common::setup_test_db;
use soulmap::db::{self, DbPool};
use soulmap::models::{CinematicStyle, MomentType, NewMoment};
use soulmap::Error;

fn new_moment(description: &str) -> NewMoment {
    NewMoment {
        user_description: description.to_string(),
        moment_type: MomentType::FutureGoal,
        cinematic_style: CinematicStyle::Epic,
        image_url: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        tags: None,
    }
}

async fn membership_count(pool: &DbPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM moment_collections")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// ============================================================================
// Moments
// ============================================================================

#[tokio::test]
async fn test_create_moment_assigns_id_and_timestamp() {
    let pool = setup_test_db().await;

    let moment = db::create_moment(&pool, new_moment("climbing Kilimanjaro"))
        .await
        .unwrap();

    assert!(!moment.id.is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&moment.created_at).is_ok());
    assert_eq!(moment.user_description, "climbing Kilimanjaro");
    assert_eq!(moment.moment_type, MomentType::FutureGoal);
    assert_eq!(moment.cinematic_style, CinematicStyle::Epic);

    let fetched = db::get_moment(&pool, &moment.id).await.unwrap();
    assert_eq!(fetched, moment);
}

#[tokio::test]
async fn test_tags_round_trip() {
    let pool = setup_test_db().await;

    let mut input = new_moment("first apartment");
    input.tags = Some(vec!["home".to_string(), "2019".to_string()]);
    let moment = db::create_moment(&pool, input).await.unwrap();

    let fetched = db::get_moment(&pool, &moment.id).await.unwrap();
    assert_eq!(fetched.tags, Some(vec!["home".to_string(), "2019".to_string()]));
}

#[tokio::test]
async fn test_list_moments_newest_first() {
    let pool = setup_test_db().await;

    let first = db::create_moment(&pool, new_moment("one")).await.unwrap();
    let second = db::create_moment(&pool, new_moment("two")).await.unwrap();
    let third = db::create_moment(&pool, new_moment("three")).await.unwrap();

    let ids: Vec<String> = db::list_moments(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();

    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn test_get_missing_moment_is_not_found() {
    let pool = setup_test_db().await;
    let err = db::get_moment(&pool, "nope").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_schema_rejects_unknown_labels() {
    let pool = setup_test_db().await;

    let result = sqlx::query(
        "INSERT INTO moments (id, user_description, moment_type, cinematic_style, image_url, created_at) \
         VALUES ('x', 'd', 'Dream', 'Epic', 'u', '2026-01-01T00:00:00.000Z')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_delete_moment_cascades_memberships() {
    let pool = setup_test_db().await;

    let moment = db::create_moment(&pool, new_moment("graduation")).await.unwrap();
    let keep = db::create_moment(&pool, new_moment("prom")).await.unwrap();
    let school = db::create_collection(&pool, "School", None).await.unwrap();

    db::set_membership(&pool, &moment.id, &school.id, true).await.unwrap();
    db::set_membership(&pool, &keep.id, &school.id, true).await.unwrap();
    assert_eq!(membership_count(&pool).await, 2);

    db::delete_moment(&pool, &moment.id).await.unwrap();

    assert!(matches!(
        db::get_moment(&pool, &moment.id).await,
        Err(Error::NotFound(_))
    ));
    assert_eq!(
        db::list_moment_ids_for_collection(&pool, &school.id).await.unwrap(),
        vec![keep.id]
    );
    assert_eq!(membership_count(&pool).await, 1);
}

#[tokio::test]
async fn test_delete_missing_moment_is_not_found() {
    let pool = setup_test_db().await;
    let err = db::delete_moment(&pool, "ghost").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

// ============================================================================
// Collections
// ============================================================================

#[tokio::test]
async fn test_collections_create_list_count() {
    let pool = setup_test_db().await;
    assert_eq!(db::count_collections(&pool).await.unwrap(), 0);

    let travel = db::create_collection(&pool, "Travel", Some("Places I went"))
        .await
        .unwrap();
    let dreams = db::create_collection(&pool, "Dreams", None).await.unwrap();

    assert_eq!(travel.description, "Places I went");
    assert_eq!(dreams.description, "");

    let names: Vec<String> = db::list_collections(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Dreams", "Travel"]);
    assert_eq!(db::count_collections(&pool).await.unwrap(), 2);

    assert_eq!(db::get_collection(&pool, &travel.id).await.unwrap(), travel);
}

// ============================================================================
// Memberships
// ============================================================================

#[tokio::test]
async fn test_set_membership_is_idempotent() {
    let pool = setup_test_db().await;
    let moment = db::create_moment(&pool, new_moment("wedding")).await.unwrap();
    let family = db::create_collection(&pool, "Family", None).await.unwrap();

    for _ in 0..2 {
        let membership = db::set_membership(&pool, &moment.id, &family.id, true)
            .await
            .unwrap();
        assert!(membership.present);
    }
    assert_eq!(membership_count(&pool).await, 1);
    assert!(db::is_member(&pool, &moment.id, &family.id).await.unwrap());

    for _ in 0..2 {
        db::set_membership(&pool, &moment.id, &family.id, false)
            .await
            .unwrap();
    }
    assert_eq!(membership_count(&pool).await, 0);
    assert!(!db::is_member(&pool, &moment.id, &family.id).await.unwrap());
}

#[tokio::test]
async fn test_toggle_twice_restores_membership() {
    let pool = setup_test_db().await;
    let moment = db::create_moment(&pool, new_moment("road trip")).await.unwrap();
    let summer = db::create_collection(&pool, "Summer", None).await.unwrap();

    for initial in [false, true] {
        db::set_membership(&pool, &moment.id, &summer.id, initial)
            .await
            .unwrap();

        for _ in 0..2 {
            let current = db::is_member(&pool, &moment.id, &summer.id).await.unwrap();
            db::set_membership(&pool, &moment.id, &summer.id, !current)
                .await
                .unwrap();
        }

        assert_eq!(
            db::is_member(&pool, &moment.id, &summer.id).await.unwrap(),
            initial
        );
    }
}

#[tokio::test]
async fn test_membership_listings() {
    let pool = setup_test_db().await;
    let a = db::create_moment(&pool, new_moment("a")).await.unwrap();
    let b = db::create_moment(&pool, new_moment("b")).await.unwrap();
    let c1 = db::create_collection(&pool, "One", None).await.unwrap();
    let c2 = db::create_collection(&pool, "Two", None).await.unwrap();

    db::set_membership(&pool, &a.id, &c1.id, true).await.unwrap();
    db::set_membership(&pool, &a.id, &c2.id, true).await.unwrap();
    db::set_membership(&pool, &b.id, &c2.id, true).await.unwrap();

    let mut for_a = db::list_collection_ids_for_moment(&pool, &a.id).await.unwrap();
    for_a.sort();
    let mut expected = vec![c1.id.clone(), c2.id.clone()];
    expected.sort();
    assert_eq!(for_a, expected);

    let mut in_c2 = db::list_moment_ids_for_collection(&pool, &c2.id).await.unwrap();
    in_c2.sort();
    let mut expected = vec![a.id.clone(), b.id.clone()];
    expected.sort();
    assert_eq!(in_c2, expected);

    assert!(db::list_moment_ids_for_collection(&pool, "unknown")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_membership_requires_existing_rows() {
    let pool = setup_test_db().await;
    let moment = db::create_moment(&pool, new_moment("orphan")).await.unwrap();

    let err = db::set_membership(&pool, &moment.id, "no-such-collection", true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}
