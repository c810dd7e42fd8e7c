//! Integration tests for the authentication service.

use formhub_auth::config::AuthConfig;
use formhub_auth::service::{AuthService, LoginInput, RegisterInput};
use formhub_auth::token;
use formhub_core::error::FormHubError;
use formhub_core::models::user::UserRole;
use formhub_core::repository::UserRepository;
use formhub_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".into(),
        jwt_issuer: "formhub-test".into(),
        ..AuthConfig::default()
    }
}

/// Spin up in-memory DB and run migrations.
async fn setup() -> (AuthService<SurrealUserRepository<Db>>, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    formhub_db::run_migrations(&db).await.unwrap();

    let svc = AuthService::new(SurrealUserRepository::new(db.clone()), test_config());
    (svc, db)
}

fn admin(email: &str) -> RegisterInput {
    RegisterInput {
        name: "Ada Admin".into(),
        email: email.into(),
        password: "correct-horse-battery".into(),
        role: Some(UserRole::Admin),
        org_code: None,
    }
}

fn employee(email: &str, org_code: &str) -> RegisterInput {
    RegisterInput {
        name: "Eve Employee".into(),
        email: email.into(),
        password: "staple-battery-horse".into(),
        role: None,
        org_code: Some(org_code.into()),
    }
}

#[tokio::test]
async fn admin_registration_issues_org_code() {
    let (svc, _db) = setup().await;

    let out = svc.register(admin("ada@example.com")).await.unwrap();
    let code = out.org_code().unwrap();

    assert_eq!(out.user.role, UserRole::Admin);
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    assert!(out.user.linked_admin.is_none());
}

#[tokio::test]
async fn admins_never_share_an_org_code() {
    let (svc, _db) = setup().await;

    let a = svc.register(admin("a@example.com")).await.unwrap();
    let b = svc.register(admin("b@example.com")).await.unwrap();

    assert_ne!(a.org_code(), b.org_code());
}

#[tokio::test]
async fn employee_links_to_admin_and_defaults_to_user_role() {
    let (svc, _db) = setup().await;

    let boss = svc.register(admin("boss@example.com")).await.unwrap();
    let code = boss.org_code().unwrap().to_lowercase();

    // Codes are accepted case-insensitively.
    let worker = svc
        .register(employee("worker@example.com", &format!(" {code} ")))
        .await
        .unwrap();

    assert_eq!(worker.user.role, UserRole::User);
    assert_eq!(worker.user.linked_admin, Some(boss.user.id));
    assert!(worker.org_code().is_none());
}

#[tokio::test]
async fn unknown_org_code_creates_no_user() {
    let (svc, db) = setup().await;

    let err = svc
        .register(employee("lost@example.com", "ZZZZZZ"))
        .await
        .unwrap_err();
    assert!(matches!(err, FormHubError::NotFound { .. }));

    let repo = SurrealUserRepository::new(db);
    assert!(matches!(
        repo.get_by_email("lost@example.com").await,
        Err(FormHubError::NotFound { .. })
    ));
}

#[tokio::test]
async fn duplicate_email_conflicts_regardless_of_case() {
    let (svc, _db) = setup().await;

    svc.register(admin("dup@example.com")).await.unwrap();
    let err = svc.register(admin("  DUP@Example.com")).await.unwrap_err();

    assert!(matches!(err, FormHubError::AlreadyExists { .. }));
}

#[tokio::test]
async fn login_happy_path() {
    let (svc, _db) = setup().await;
    let reg = svc.register(admin("login@example.com")).await.unwrap();

    let out = svc
        .login(LoginInput {
            email: "Login@Example.com ".into(),
            password: "correct-horse-battery".into(),
        })
        .await
        .unwrap();

    assert_eq!(out.user.id, reg.user.id);
    assert_eq!(out.expires_in, 3600);

    let claims = token::validate_access_token(&out.access_token, svc.config()).unwrap();
    assert_eq!(claims.user_id, reg.user.id);
    assert_eq!(claims.role, UserRole::Admin);

    let current = svc.current_user(&claims).await.unwrap();
    assert_eq!(current.email, "login@example.com");
}

#[tokio::test]
async fn login_wrong_password_fails() {
    let (svc, _db) = setup().await;
    svc.register(admin("wrong@example.com")).await.unwrap();

    let err = svc
        .login(LoginInput {
            email: "wrong@example.com".into(),
            password: "not-the-password".into(),
        })
        .await
        .unwrap_err();

    assert!(
        matches!(err, FormHubError::AuthenticationFailed { ref reason } if reason == "invalid credentials")
    );
}

#[tokio::test]
async fn login_with_pepper_requires_matching_repository_pepper() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    formhub_db::run_migrations(&db).await.unwrap();

    let config = AuthConfig {
        pepper: Some("server-pepper".into()),
        ..test_config()
    };
    let svc = AuthService::new(
        SurrealUserRepository::with_pepper(db.clone(), "server-pepper".into()),
        config,
    );

    svc.register(admin("pep@example.com")).await.unwrap();
    svc.login(LoginInput {
        email: "pep@example.com".into(),
        password: "correct-horse-battery".into(),
    })
    .await
    .unwrap();

    // A service without the pepper cannot verify the same hash.
    let plain = AuthService::new(SurrealUserRepository::new(db), test_config());
    assert!(
        plain
            .login(LoginInput {
                email: "pep@example.com".into(),
                password: "correct-horse-battery".into(),
            })
            .await
            .is_err()
    );
}

#[tokio::test]
async fn authenticate_rejects_tampered_token() {
    let (svc, _db) = setup().await;
    svc.register(admin("tamper@example.com")).await.unwrap();

    let out = svc
        .login(LoginInput {
            email: "tamper@example.com".into(),
            password: "correct-horse-battery".into(),
        })
        .await
        .unwrap();

    let mut tampered = out.access_token.clone();
    tampered.push('x');

    assert!(svc.authenticate(&out.access_token).is_ok());
    assert!(matches!(
        svc.authenticate(&tampered),
        Err(FormHubError::AuthenticationFailed { .. })
    ));
}
