#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use campus::campus_config::{CorsConfig, EmailConfig, JwtConfig, ResetTokenConfig};
use campus::router::init_router;
use campus::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        db: pool,
        jwt_config: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 3600,
        },
        email_config: EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@campus.local".to_string(),
            from_name: "Campus".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        },
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        reset_token_config: ResetTokenConfig::default(),
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub async fn create_test_role(
    pool: &PgPool,
    name: &str,
    is_super_admin: bool,
    permissions: &[&str],
) -> Uuid {
    let permissions: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
    sqlx::query_scalar(
        "INSERT INTO roles (name, is_super_admin, permissions) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(is_super_admin)
    .bind(&permissions)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts an employee whose password is [`TEST_PASSWORD`].
pub async fn create_test_employee(
    pool: &PgPool,
    username: &str,
    email: &str,
    role_id: Option<Uuid>,
) -> Uuid {
    let hashed = bcrypt::hash(TEST_PASSWORD, 4).unwrap();
    sqlx::query_scalar(
        "INSERT INTO employees (first_name, username, email, password_hash, mobile, role_id)
         VALUES ('Test', $1, $2, $3, '9876543210', $4)
         RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(&hashed)
    .bind(role_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts a student whose password is [`TEST_PASSWORD`].
pub async fn create_test_student(pool: &PgPool, username: &str, email: &str) -> Uuid {
    let hashed = bcrypt::hash(TEST_PASSWORD, 4).unwrap();
    sqlx::query_scalar(
        "INSERT INTO students (first_name, username, email, password_hash, mobile)
         VALUES ('Test', $1, $2, $3, '9876543210')
         RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Sends one request and returns the status with the parsed JSON body.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "Non-JSON response. Status: {}, Body: {:?}",
                status,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, body)
}

/// Logs in through `/auth/{kind}/login` and returns the bearer token.
pub async fn get_auth_token(pool: &PgPool, kind: &str, email: &str, password: &str) -> String {
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/auth/{kind}/login"),
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;

    body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("No token in response. Status: {status}, Body: {body}"))
        .to_string()
}

/// Creates an employee holding a fresh role with `permissions` and logs in.
pub async fn employee_token_with(pool: &PgPool, permissions: &[&str]) -> String {
    let role_name = format!("ROLE {}", Uuid::new_v4());
    let role_id = create_test_role(pool, &role_name, false, permissions).await;
    let email = generate_unique_email();
    let username = format!("emp_{}", Uuid::new_v4().simple());
    create_test_employee(pool, &username, &email, Some(role_id)).await;
    get_auth_token(pool, "employee", &email, TEST_PASSWORD).await
}
