//! Integration tests for the User repository using in-memory SurrealDB.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use formhub_core::error::FormHubError;
use formhub_core::models::user::{CreateUser, UserRole};
use formhub_core::repository::UserRepository;
use formhub_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    formhub_db::run_migrations(&db).await.unwrap();
    db
}

fn admin(email: &str, org_code: &str) -> CreateUser {
    CreateUser {
        name: "Admin".into(),
        email: email.into(),
        password: "SuperSecret123!".into(),
        role: UserRole::Admin,
        org_code: Some(org_code.into()),
        linked_admin: None,
    }
}

fn employee(email: &str, linked_admin: Uuid) -> CreateUser {
    CreateUser {
        name: "Employee".into(),
        email: email.into(),
        password: "AnotherSecret42".into(),
        role: UserRole::User,
        org_code: None,
        linked_admin: Some(linked_admin),
    }
}

async fn user_count(db: &Surreal<Db>) -> usize {
    let mut result = db.query("SELECT * FROM user").await.unwrap();
    let rows: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    rows.len()
}

#[tokio::test]
async fn create_and_get_admin() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(admin("ada@example.com", "A1B2C3"))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Admin);
    assert_eq!(user.org_code.as_deref(), Some("A1B2C3"));
    assert!(user.linked_admin.is_none());

    // Password should be hashed, not stored in plaintext.
    assert_ne!(user.password_hash, "SuperSecret123!");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, "ada@example.com");
}

#[tokio::test]
async fn stored_hash_verifies() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(admin("bob@example.com", "B0B0B0"))
        .await
        .unwrap();

    let parsed = PasswordHash::new(&user.password_hash).unwrap();
    assert!(
        Argon2::default()
            .verify_password(b"SuperSecret123!", &parsed)
            .is_ok()
    );
    assert!(
        Argon2::default()
            .verify_password(b"wrong", &parsed)
            .is_err()
    );
}

#[tokio::test]
async fn pepper_is_prepended_before_hashing() {
    let db = setup().await;
    let repo = SurrealUserRepository::with_pepper(db, "pepper!".into());

    let user = repo
        .create(admin("carol@example.com", "C4C4C4"))
        .await
        .unwrap();

    let parsed = PasswordHash::new(&user.password_hash).unwrap();
    assert!(
        Argon2::default()
            .verify_password(b"pepper!SuperSecret123!", &parsed)
            .is_ok()
    );
    assert!(
        Argon2::default()
            .verify_password(b"SuperSecret123!", &parsed)
            .is_err()
    );
}

#[tokio::test]
async fn employee_is_linked_to_admin() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let boss = repo
        .create(admin("boss@example.com", "D5D5D5"))
        .await
        .unwrap();
    let worker = repo
        .create(employee("worker@example.com", boss.id))
        .await
        .unwrap();

    assert_eq!(worker.role, UserRole::User);
    assert_eq!(worker.linked_admin, Some(boss.id));
    assert!(worker.org_code.is_none());
}

#[tokio::test]
async fn org_code_collision_persists_nothing() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db.clone());

    repo.create(admin("first@example.com", "E6E6E6"))
        .await
        .unwrap();
    let err = repo
        .create(admin("second@example.com", "E6E6E6"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, FormHubError::AlreadyExists { ref entity } if entity == "org_code"),
        "unexpected error: {err:?}"
    );
    assert_eq!(user_count(&db).await, 1);
    assert!(repo.get_by_email("second@example.com").await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_admins_cannot_share_an_org_code() {
    for round in 0..5 {
        let db = setup().await;
        let repo = SurrealUserRepository::new(db.clone());
        let first = format!("first-{round}@example.com");
        let second = format!("second-{round}@example.com");

        let (a, b) = tokio::join!(
            repo.create(admin(&first, "C0FFEE")),
            repo.create(admin(&second, "C0FFEE")),
        );

        let (winner, loser) = match (a, b) {
            (Ok(user), Err(err)) | (Err(err), Ok(user)) => (user, err),
            other => panic!("expected exactly one winner, got {other:?}"),
        };
        assert_eq!(winner.org_code.as_deref(), Some("C0FFEE"));
        assert!(
            matches!(loser, FormHubError::AlreadyExists { ref entity } if entity == "org_code"),
            "unexpected error: {loser:?}"
        );
        assert_eq!(user_count(&db).await, 1);
        let owner = repo.get_admin_by_org_code("C0FFEE").await.unwrap();
        assert_eq!(owner.id, winner.id);
    }
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let boss = repo
        .create(admin("dup@example.com", "F7F7F7"))
        .await
        .unwrap();
    let err = repo
        .create(employee("dup@example.com", boss.id))
        .await
        .unwrap_err();

    assert!(matches!(err, FormHubError::AlreadyExists { ref entity } if entity == "user"));
}

#[tokio::test]
async fn resolve_admin_by_org_code() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let boss = repo
        .create(admin("org@example.com", "0A0B0C"))
        .await
        .unwrap();

    let found = repo.get_admin_by_org_code("0A0B0C").await.unwrap();
    assert_eq!(found.id, boss.id);

    let missing = repo.get_admin_by_org_code("FFFFFF").await;
    assert!(matches!(missing, Err(FormHubError::NotFound { .. })));
}

#[tokio::test]
async fn get_by_email_and_missing_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let boss = repo
        .create(admin("lookup@example.com", "1A2B3C"))
        .await
        .unwrap();

    let fetched = repo.get_by_email("lookup@example.com").await.unwrap();
    assert_eq!(fetched.id, boss.id);

    assert!(matches!(
        repo.get_by_id(Uuid::new_v4()).await,
        Err(FormHubError::NotFound { .. })
    ));
}
