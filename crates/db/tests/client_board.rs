//! Integration tests for client CRUD and kanban placement.
//!
//! Exercises `ClientRepo` against a real database:
//! - New clients land at the end of their column
//! - Status changes append to the new column
//! - Moves renumber source and target columns densely
//! - Rows are scoped to their owner

use clienter_core::client::{plan_move, ClientStatus};
use clienter_db::models::client::{CreateClient, UpdateClient};
use clienter_db::repositories::ClientRepo;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_client(name: &str, status: Option<ClientStatus>) -> CreateClient {
    CreateClient {
        name: name.to_string(),
        phone: None,
        project_description: None,
        total_amount: None,
        advance_paid: None,
        status,
    }
}

async fn names_in(pool: &PgPool, user_id: Uuid, status: ClientStatus) -> Vec<(String, i32)> {
    ClientRepo::list(pool, user_id, Some(status))
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.name, c.position))
        .collect()
}

// ---------------------------------------------------------------------------
// Create / list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_appends_to_column(pool: PgPool) {
    let user = Uuid::new_v4();

    let a = ClientRepo::create(&pool, user, &new_client("Acme", None))
        .await
        .unwrap();
    let b = ClientRepo::create(&pool, user, &new_client("Globex", None))
        .await
        .unwrap();
    let c = ClientRepo::create(&pool, user, &new_client("Initech", Some(ClientStatus::Ongoing)))
        .await
        .unwrap();

    assert_eq!(a.status, ClientStatus::Potential);
    assert_eq!(a.position, 0);
    assert_eq!(b.position, 1);
    assert_eq!(c.status, ClientStatus::Ongoing);
    assert_eq!(c.position, 0);
    assert_eq!(a.advance_paid, 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_status_and_owner(pool: PgPool) {
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();

    ClientRepo::create(&pool, user, &new_client("Acme", None))
        .await
        .unwrap();
    ClientRepo::create(&pool, user, &new_client("Initech", Some(ClientStatus::Completed)))
        .await
        .unwrap();
    ClientRepo::create(&pool, other, &new_client("Hooli", None))
        .await
        .unwrap();

    let all = ClientRepo::list(&pool, user, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Acme", "potential column comes first");

    let completed = ClientRepo::list(&pool, user, Some(ClientStatus::Completed))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].name, "Initech");

    assert_eq!(ClientRepo::count(&pool, user).await.unwrap(), 2);
    assert_eq!(ClientRepo::count(&pool, other).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_users_cannot_read_or_delete(pool: PgPool) {
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let client = ClientRepo::create(&pool, owner, &new_client("Acme", None))
        .await
        .unwrap();

    let found = ClientRepo::find_by_id(&pool, intruder, client.id)
        .await
        .unwrap();
    assert!(found.is_none());

    let deleted = ClientRepo::delete(&pool, intruder, client.id).await.unwrap();
    assert!(!deleted);
    assert!(ClientRepo::find_by_id(&pool, owner, client.id)
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_status_appends_to_new_column(pool: PgPool) {
    let user = Uuid::new_v4();
    ClientRepo::create(&pool, user, &new_client("Initech", Some(ClientStatus::Ongoing)))
        .await
        .unwrap();
    let acme = ClientRepo::create(&pool, user, &new_client("Acme", None))
        .await
        .unwrap();

    let patch = UpdateClient {
        status: Some(ClientStatus::Ongoing),
        total_amount: Some(1200.0),
        ..Default::default()
    };
    let updated = ClientRepo::update(&pool, user, acme.id, &patch)
        .await
        .unwrap()
        .expect("client exists");

    assert_eq!(updated.status, ClientStatus::Ongoing);
    assert_eq!(updated.position, 1);
    assert_eq!(updated.total_amount, Some(1200.0));
    assert_eq!(updated.name, "Acme", "absent fields are left unchanged");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_client_returns_none(pool: PgPool) {
    let result = ClientRepo::update(&pool, Uuid::new_v4(), Uuid::new_v4(), &UpdateClient::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Board moves
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_renumbers_both_columns(pool: PgPool) {
    let user = Uuid::new_v4();
    let mut potential = Vec::new();
    for name in ["A", "B", "C"] {
        potential.push(
            ClientRepo::create(&pool, user, &new_client(name, None))
                .await
                .unwrap(),
        );
    }
    for name in ["X", "Y"] {
        ClientRepo::create(&pool, user, &new_client(name, Some(ClientStatus::Ongoing)))
            .await
            .unwrap();
    }

    let mut tx = pool.begin().await.unwrap();
    let cards = ClientRepo::lock_board(&mut tx, user).await.unwrap();
    let placements = plan_move(&cards, potential[1].id, ClientStatus::Ongoing, 1).unwrap();
    ClientRepo::apply_placements(&mut tx, user, &placements)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        names_in(&pool, user, ClientStatus::Potential).await,
        vec![("A".to_string(), 0), ("C".to_string(), 1)]
    );
    assert_eq!(
        names_in(&pool, user, ClientStatus::Ongoing).await,
        vec![("X".to_string(), 0), ("B".to_string(), 1), ("Y".to_string(), 2)]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_within_column(pool: PgPool) {
    let user = Uuid::new_v4();
    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        ids.push(
            ClientRepo::create(&pool, user, &new_client(name, None))
                .await
                .unwrap()
                .id,
        );
    }

    let mut tx = pool.begin().await.unwrap();
    let cards = ClientRepo::lock_board(&mut tx, user).await.unwrap();
    let placements = plan_move(&cards, ids[2], ClientStatus::Potential, 0).unwrap();
    let changed = ClientRepo::apply_placements(&mut tx, user, &placements)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(changed, 3);
    assert_eq!(
        names_in(&pool, user, ClientStatus::Potential).await,
        vec![
            ("C".to_string(), 0),
            ("A".to_string(), 1),
            ("B".to_string(), 2)
        ]
    );
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_amount_rejected_by_check(pool: PgPool) {
    let mut input = new_client("Acme", None);
    input.total_amount = Some(-1.0);

    let err = ClientRepo::create(&pool, Uuid::new_v4(), &input)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23514"));
            assert_eq!(db_err.constraint(), Some("ck_clients_total_amount"));
        }
        other => panic!("expected check violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_advance_cannot_exceed_total(pool: PgPool) {
    let user = Uuid::new_v4();
    let input = CreateClient {
        total_amount: Some(1000.0),
        advance_paid: Some(400.0),
        ..new_client("Acme", None)
    };
    let acme = ClientRepo::create(&pool, user, &input).await.unwrap();

    // Lowering the total below what was already paid is rejected by the
    // database, whatever the handler checked beforehand.
    let patch = UpdateClient {
        total_amount: Some(300.0),
        ..Default::default()
    };
    let err = ClientRepo::update(&pool, user, acme.id, &patch)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23514"));
            assert_eq!(db_err.constraint(), Some("ck_clients_advance_within_total"));
        }
        other => panic!("expected check violation, got {other:?}"),
    }

    let unchanged = ClientRepo::find_by_id(&pool, user, acme.id)
        .await
        .unwrap()
        .expect("client exists");
    assert_eq!(unchanged.total_amount, Some(1000.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_for_update_is_owner_scoped(pool: PgPool) {
    let user = Uuid::new_v4();
    let acme = ClientRepo::create(&pool, user, &new_client("Acme", None))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let locked = ClientRepo::find_for_update(&mut tx, user, acme.id)
        .await
        .unwrap();
    assert_eq!(locked.map(|c| c.id), Some(acme.id));
    let foreign = ClientRepo::find_for_update(&mut tx, Uuid::new_v4(), acme.id)
        .await
        .unwrap();
    assert!(foreign.is_none());

    let patch = UpdateClient {
        advance_paid: Some(10.0),
        ..Default::default()
    };
    let updated = ClientRepo::update(&mut *tx, user, acme.id, &patch)
        .await
        .unwrap()
        .expect("client exists");
    tx.commit().await.unwrap();
    assert_eq!(updated.advance_paid, 10.0);
}
