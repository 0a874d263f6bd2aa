mod common;

use axum::http::StatusCode;
use campus::campus_core::permissions::{
    DEPARTMENT_CREATE, DEPARTMENT_READ, EXAM_CREATE, EXAM_READ, ROLE_CREATE,
};
use axum::routing::get;
use axum::{Router, middleware};
use campus::middleware::authorize::{authorize, authorize_request};
use common::{
    TEST_PASSWORD, create_test_employee, create_test_role, employee_token_with,
    generate_unique_email, get_auth_token, send, setup_test_app, test_state,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_super_admin_bypasses_permission_table(pool: PgPool) {
    let super_role = create_test_role(&pool, "SUPER ADMIN", true, &[]).await;
    create_test_employee(&pool, "super_admin", "superadmin@gmail.com", Some(super_role)).await;

    let token = get_auth_token(&pool, "employee", "superadmin@gmail.com", TEST_PASSWORD).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/role/create",
        Some(&token),
        Some(json!({
            "name": "STUDENT",
            "isSuperAdmin": false,
            "permissions": ["READ", "WRITE", "student.create"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["permissions"], json!(["READ", "WRITE", "student.create"]));

    assert!(
        authorize(&pool, "anything.not.listed", Some(super_role))
            .await
            .is_ok()
    );

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/exam/getall",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_header_is_unauthorized(pool: PgPool) {
    let (status, body) = send(setup_test_app(pool), "GET", "/department/getall", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["data"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_garbage_token_is_unauthorized(pool: PgPool) {
    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        "/profile",
        Some("not.a.jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_permission_is_forbidden(pool: PgPool) {
    let token = employee_token_with(&pool, &[DEPARTMENT_READ]).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/department/getall",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/department/create",
        Some(&token),
        Some(json!({ "name": "Physics" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["data"].is_null());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_prefix_permission_does_not_match(pool: PgPool) {
    let token = employee_token_with(&pool, &["department.department", "department"]).await;

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        "/department/getall",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_role_is_unauthorized_not_server_error(pool: PgPool) {
    let role_id = create_test_role(&pool, "SHORT LIVED", false, &[EXAM_READ]).await;
    let email = generate_unique_email();
    create_test_employee(&pool, "short_lived", &email, Some(role_id)).await;
    let token = get_auth_token(&pool, "employee", &email, TEST_PASSWORD).await;

    sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(role_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        "/exam/getall",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_self_permissions_need_only_authentication(pool: PgPool) {
    let token = employee_token_with(&pool, &[]).await;

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        "/role/get-permissions/self",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isSuperAdmin"], false);
    assert_eq!(body["data"]["permissions"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_id_is_unprocessable(pool: PgPool) {
    let token = employee_token_with(&pool, &[DEPARTMENT_READ]).await;

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        "/department/get/not-an-id",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["path"], "departmentId");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_name_conflict_reports_field(pool: PgPool) {
    let token = employee_token_with(&pool, &[ROLE_CREATE, DEPARTMENT_CREATE, EXAM_CREATE]).await;
    create_test_role(&pool, "TEACHER", false, &[]).await;

    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/role/create",
        Some(&token),
        Some(json!({ "name": "TEACHER", "permissions": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"], "name");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_route_without_access_entry_is_refused(pool: PgPool) {
    let super_role = create_test_role(&pool, "SUPER ADMIN", true, &[]).await;
    create_test_employee(&pool, "super_admin", "superadmin@gmail.com", Some(super_role)).await;
    let token = get_auth_token(&pool, "employee", "superadmin@gmail.com", TEST_PASSWORD).await;

    let state = test_state(pool);
    let app = Router::new()
        .route("/student/export", get(|| async { "exported" }))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authorize_request,
        ))
        .with_state(state);

    let (status, body) = send(app, "GET", "/student/export", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");
}
