mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};

use lead_crm::database::LeadStore;

use common::{assert_redirect, json_body, TestApp, PASSWORD};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/health", None).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["store"], "memory");
    Ok(())
}

#[tokio::test]
async fn landing_page_lists_links() -> Result<()> {
    let app = TestApp::new();

    let body = json_body(app.get("/", None).await?).await?;
    assert_eq!(body["data"]["links"]["signup"], "/signup");
    assert!(body["data"]["version"].is_string());
    Ok(())
}

#[tokio::test]
async fn signup_form_context_is_public() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/signup", None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await?;
    assert_eq!(body["data"]["form"]["min_password_length"], 8);
    Ok(())
}

#[tokio::test]
async fn signup_creates_organiser_and_organization() -> Result<()> {
    let app = TestApp::new();
    let session = app.organiser("boss").await?;

    let user = app.store.find_user(session.user_id).await?.expect("user stored");
    assert!(user.is_organiser);
    assert!(!user.is_agent);
    assert_ne!(user.password_hash, PASSWORD);
    assert_eq!(session.agent_id, None);
    Ok(())
}

#[tokio::test]
async fn signup_rejects_mismatched_passwords() -> Result<()> {
    let app = TestApp::new();

    let res = app
        .post_form(
            "/signup",
            &[
                ("username", "boss"),
                ("email", "boss@example.com"),
                ("password1", PASSWORD),
                ("password2", "something else"),
            ],
            None,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(res).await?;
    assert!(body["field_errors"]["password2"].is_string());
    assert!(app.store.find_user_by_username("boss").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() -> Result<()> {
    let app = TestApp::new();
    app.organiser("boss").await?;

    let res = app
        .post_form(
            "/signup",
            &[
                ("username", "boss"),
                ("email", "other@example.com"),
                ("password1", PASSWORD),
                ("password2", PASSWORD),
            ],
            None,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let app = TestApp::new();
    app.organiser("boss").await?;

    let res = app
        .post_form("/login", &[("username", "boss"), ("password", "not it at all")], None)
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::SET_COOKIE).is_none());

    let body = json_body(res).await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_unauthorized() -> Result<()> {
    let app = TestApp::new();

    let res = app
        .post_form("/login", &[("username", "ghost"), ("password", PASSWORD)], None)
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> Result<()> {
    let app = TestApp::new();
    let session = app.organiser("boss").await?;

    let res = app.post_form("/logout", &[], Some(&session)).await?;
    assert_redirect(&res, "/");

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("session=;"));
    assert!(cookie.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn bearer_token_is_accepted() -> Result<()> {
    let app = TestApp::new();
    let session = app.organiser("boss").await?;
    let token = session.cookie.trim_start_matches("session=").to_string();

    let request = axum::http::Request::builder()
        .uri("/leads")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(axum::body::Body::empty())?;
    let res = app.send(request).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn anonymous_lead_routes_redirect_to_login() -> Result<()> {
    let app = TestApp::new();
    let id = uuid::Uuid::new_v4();

    for path in [
        "/leads".to_string(),
        "/leads/create".to_string(),
        format!("/leads/{}", id),
        format!("/leads/{}/update", id),
        format!("/leads/{}/delete", id),
        "/agents".to_string(),
    ] {
        let res = app.get(&path, None).await?;
        assert_redirect(&res, "/login");
    }

    let res = app
        .post_form("/leads/create", &common::lead_fields("Ada", ""), None)
        .await?;
    assert_redirect(&res, "/login");
    assert_eq!(app.store.lead_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn forged_cookie_redirects_to_login() -> Result<()> {
    let app = TestApp::new();
    let mut session = app.organiser("boss").await?;
    session.cookie = "session=not.a.token".to_string();

    let res = app.get("/leads", Some(&session)).await?;
    assert_redirect(&res, "/login");
    Ok(())
}
