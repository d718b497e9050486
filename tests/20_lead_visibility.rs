mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{json_body, names, TestApp};

#[tokio::test]
async fn organiser_sees_assigned_and_unassigned_separately() -> Result<()> {
    let app = TestApp::new();
    let boss = app.organiser("boss").await?;
    let alice = app.agent(&boss, "alice").await?;

    app.create_lead(&boss, "Assigned", alice.agent_id).await?;
    app.create_lead(&boss, "Floating", None).await?;

    let body = json_body(app.get("/leads", Some(&boss)).await?).await?;
    assert_eq!(names(&body["data"]["leads"]), vec!["Assigned"]);
    assert_eq!(names(&body["data"]["unassigned_leads"]), vec!["Floating"]);
    Ok(())
}

#[tokio::test]
async fn agent_sees_only_own_assignments() -> Result<()> {
    let app = TestApp::new();
    let boss = app.organiser("boss").await?;
    let alice = app.agent(&boss, "alice").await?;
    let bob = app.agent(&boss, "bob").await?;

    app.create_lead(&boss, "ForAlice", alice.agent_id).await?;
    app.create_lead(&boss, "ForBob", bob.agent_id).await?;
    app.create_lead(&boss, "Nobody", None).await?;

    let body = json_body(app.get("/leads", Some(&alice)).await?).await?;
    assert_eq!(names(&body["data"]["leads"]), vec!["ForAlice"]);
    assert!(body["data"].get("unassigned_leads").is_none());
    Ok(())
}

#[tokio::test]
async fn organizations_do_not_see_each_other() -> Result<()> {
    let app = TestApp::new();
    let acme = app.organiser("acme").await?;
    let globex = app.organiser("globex").await?;
    let acme_agent = app.agent(&acme, "wile").await?;

    app.create_lead(&acme, "AcmeLead", acme_agent.agent_id).await?;
    app.create_lead(&acme, "AcmeSpare", None).await?;
    app.create_lead(&globex, "GlobexLead", None).await?;

    let body = json_body(app.get("/leads", Some(&globex)).await?).await?;
    assert!(names(&body["data"]["leads"]).is_empty());
    assert_eq!(names(&body["data"]["unassigned_leads"]), vec!["GlobexLead"]);
    Ok(())
}

#[tokio::test]
async fn list_keeps_insertion_order() -> Result<()> {
    let app = TestApp::new();
    let boss = app.organiser("boss").await?;

    for name in ["First", "Second", "Third"] {
        app.create_lead(&boss, name, None).await?;
    }

    let body = json_body(app.get("/leads", Some(&boss)).await?).await?;
    assert_eq!(names(&body["data"]["unassigned_leads"]), vec!["First", "Second", "Third"]);
    Ok(())
}

#[tokio::test]
async fn detail_is_scoped_like_the_list() -> Result<()> {
    let app = TestApp::new();
    let boss = app.organiser("boss").await?;
    let alice = app.agent(&boss, "alice").await?;
    let bob = app.agent(&boss, "bob").await?;
    let outsider = app.organiser("outsider").await?;

    let lead = app.create_lead(&boss, "ForAlice", alice.agent_id).await?;
    let path = format!("/leads/{}", lead.id);

    let res = app.get(&path, Some(&boss)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await?;
    assert_eq!(body["data"]["lead"]["first_name"], "ForAlice");

    assert_eq!(app.get(&path, Some(&alice)).await?.status(), StatusCode::OK);
    assert_eq!(app.get(&path, Some(&bob)).await?.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get(&path, Some(&outsider)).await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_lead_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let boss = app.organiser("boss").await?;

    let res = app.get(&format!("/leads/{}", uuid::Uuid::new_v4()), Some(&boss)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = json_body(res).await?;
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn malformed_lead_id_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let boss = app.organiser("boss").await?;

    for path in ["/leads/not-a-uuid", "/leads/not-a-uuid/update", "/leads/not-a-uuid/delete"] {
        let res = app.get(path, Some(&boss)).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", path);
        let body = json_body(res).await?;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    let res = app.post_form("/leads/not-a-uuid/delete", &[], Some(&boss)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
