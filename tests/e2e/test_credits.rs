use crate::e2e::helpers;

use academy_backend::domain::auth::Role;
use academy_backend::domain::organization::Plan;
use academy_backend::domain::quota::ResourceKind;
use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_lift_the_limit_after_a_grant(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Free).await;
    ctx.fixtures
        .set_usage(org.id, ResourceKind::AiCredits, 100)
        .await
        .unwrap();

    let blocked = ctx
        .client
        .post_with_auth("/api/ai/text", &json!({ "prompt": "Outline unit 3" }), &owner.token)
        .await
        .unwrap();
    blocked.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let grant = ctx
        .client
        .post_with_auth(
            "/api/credits/grants",
            &json!({ "resource": "ai_credits", "amount": 50 }),
            &owner.token,
        )
        .await
        .unwrap();

    grant.assert_status(StatusCode::OK);
    let body = grant.body.as_ref().unwrap();
    assert_eq!(body["resource"], "ai_credits");
    assert_eq!(body["subject_id"], org.id.to_string());
    assert_eq!(body["base_limit"], json!({ "kind": "limited", "value": 100 }));
    assert_eq!(body["bonus"], 50);
    assert_eq!(body["limit"], 150);

    let response = ctx
        .client
        .post_with_auth("/api/ai/text", &json!({ "prompt": "Outline unit 3" }), &owner.token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["quota"]["limit"], 150);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accumulate_grants(ctx: &TestContext) {
    let (_org, owner) = ctx.academy(Plan::Pro).await;

    for _ in 0..2 {
        ctx.client
            .post_with_auth(
                "/api/credits/grants",
                &json!({ "resource": "email_credits", "amount": 250 }),
                &owner.token,
            )
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    let response = ctx
        .client
        .get_with_auth("/api/usage/email_credits", &owner.token)
        .await
        .unwrap();
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["bonus"], 500);
    assert_eq!(body["status"]["limit"], 5500);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_grant_tutor_messages_to_the_caller(ctx: &TestContext) {
    let (_org, owner) = ctx.academy(Plan::Free).await;

    let response = ctx
        .client
        .post_with_auth(
            "/api/credits/grants",
            &json!({ "resource": "tutor_messages", "amount": 10 }),
            &owner.token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["subject_id"], owner.user.id.to_string());
    assert_eq!(body["limit"], 60);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forbid_grants_from_non_admins(ctx: &TestContext) {
    let (org, _owner) = ctx.academy(Plan::Free).await;
    let instructor = ctx.member(&org, "teacher@example.com", Role::Instructor).await;

    let response = ctx
        .client
        .post_with_auth(
            "/api/credits/grants",
            &json!({ "resource": "ai_credits", "amount": 50 }),
            &instructor.token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_error_code("FORBIDDEN");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_non_positive_amount(ctx: &TestContext) {
    let (_org, owner) = ctx.academy(Plan::Free).await;

    let response = ctx
        .client
        .post_with_auth(
            "/api/credits/grants",
            &json!({ "resource": "ai_credits", "amount": 0 }),
            &owner.token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_code("BAD_REQUEST");
}
