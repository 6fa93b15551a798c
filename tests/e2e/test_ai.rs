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
async fn it_should_generate_text_and_charge_credits(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Pro).await;
    ctx.ai_gateway.set_tokens(2500);

    let response = ctx
        .client
        .post_with_auth(
            "/api/ai/text",
            &json!({ "prompt": "Explain photosynthesis to a ten year old" }),
            &owner.token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["text"], "Generated lesson text");
    assert_eq!(body["total_tokens"], 2500);
    assert_eq!(body["charged"], 3);
    assert_eq!(body["near_limit"], false);
    assert_eq!(body["quota"]["used"], 3);
    assert_eq!(body["quota"]["limit"], 1000);
    assert_eq!(body["quota"]["remaining"], 997);

    let used = ctx.fixtures.get_usage(org.id, ResourceKind::AiCredits).await.unwrap();
    assert_eq!(used, 3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_flag_near_limit_when_crossing_eighty_percent(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Pro).await;
    ctx.fixtures
        .set_usage(org.id, ResourceKind::AiCredits, 799)
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth("/api/ai/text", &json!({ "prompt": "Summarize lesson one" }), &owner.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["charged"], 1);
    assert_eq!(body["near_limit"], true);
    assert_eq!(body["quota"]["used"], 800);
    assert_eq!(body["quota"]["percentage"], 80);
    assert_eq!(body["quota"]["is_at_limit"], false);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_generation_at_limit_without_calling_provider(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Pro).await;
    ctx.fixtures
        .set_usage(org.id, ResourceKind::AiCredits, 1000)
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth("/api/ai/text", &json!({ "prompt": "One more please" }), &owner.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    response.assert_error_code("LIMIT_REACHED");
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["resource"], "ai_credits");
    assert_eq!(body["used"], 1000);
    assert_eq!(body["limit"], 1000);

    assert_eq!(ctx.ai_gateway.calls(), 0);
    let used = ctx.fixtures.get_usage(org.id, ResourceKind::AiCredits).await.unwrap();
    assert_eq!(used, 1000);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_charge_when_provider_fails(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Free).await;
    ctx.fixtures
        .set_usage(org.id, ResourceKind::AiCredits, 10)
        .await
        .unwrap();
    ctx.ai_gateway.fail();

    let response = ctx
        .client
        .post_with_auth("/api/ai/image", &json!({ "prompt": "A friendly robot teacher" }), &owner.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    response.assert_error_code("UPSTREAM_FAILED");
    assert_eq!(ctx.ai_gateway.calls(), 1);

    let used = ctx.fixtures.get_usage(org.id, ResourceKind::AiCredits).await.unwrap();
    assert_eq!(used, 10);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_charge_one_credit_per_image(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Free).await;

    let response = ctx
        .client
        .post_with_auth("/api/ai/image", &json!({ "prompt": "A map of the Roman empire" }), &owner.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["url"], "https://images.academy.test/generated.png");
    assert_eq!(body["charged"], 1);

    let used = ctx.fixtures.get_usage(org.id, ResourceKind::AiCredits).await.unwrap();
    assert_eq!(used, 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_a_valid_quiz(ctx: &TestContext) {
    let (_org, owner) = ctx.academy(Plan::Pro).await;
    ctx.ai_gateway.set_reply(
        r#"```json
{"title": "Fractions", "questions": [{"prompt": "What is 1/2 + 1/4?", "options": ["3/4", "2/6"], "correct_index": 0}]}
```"#,
    );

    let response = ctx
        .client
        .post_with_auth(
            "/api/ai/quiz",
            &json!({ "topic": "Adding fractions", "question_count": 1 }),
            &owner.token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["quiz"]["title"], "Fractions");
    assert_eq!(body["quiz"]["questions"].as_array().unwrap().len(), 1);
    assert_eq!(body["charged"], 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_charge_for_an_unusable_quiz(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Pro).await;
    ctx.ai_gateway.set_reply("Sorry, I cannot help with that.");

    let response = ctx
        .client
        .post_with_auth("/api/ai/quiz", &json!({ "topic": "Volcanoes" }), &owner.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    let used = ctx.fixtures.get_usage(org.id, ResourceKind::AiCredits).await.unwrap();
    assert_eq!(used, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_never_block_unlimited_plans(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Enterprise).await;
    ctx.fixtures
        .set_usage(org.id, ResourceKind::AiCredits, 1_000_000)
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth("/api/ai/text", &json!({ "prompt": "Draft a syllabus" }), &owner.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert!(body["quota"]["limit"].is_null());
    assert_eq!(body["near_limit"], false);
    assert_eq!(body["quota"]["used"], 1_000_001);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_an_empty_prompt(ctx: &TestContext) {
    let (_org, owner) = ctx.academy(Plan::Pro).await;

    let response = ctx
        .client
        .post_with_auth("/api/ai/text", &json!({ "prompt": "   " }), &owner.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.ai_gateway.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_authentication(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/ai/text", &json!({ "prompt": "Hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_meter_tutor_messages_per_user(ctx: &TestContext) {
    let (org, owner) = ctx.academy(Plan::Free).await;
    let student = ctx
        .member(&org, "learner@academy.test", Role::Student)
        .await;
    ctx.fixtures
        .set_usage(student.user.id, ResourceKind::TutorMessages, 50)
        .await
        .unwrap();

    // The exhausted student is blocked
    let response = ctx
        .client
        .post_with_auth("/api/tutor/messages", &json!({ "message": "What is a noun?" }), &student.token)
        .await
        .unwrap();
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    // The owner has their own allowance
    let response = ctx
        .client
        .post_with_auth(
            "/api/tutor/messages",
            &json!({
                "message": "And a verb?",
                "course_title": "Grammar basics",
                "history": [
                    { "role": "user", "content": "What is a noun?" },
                    { "role": "assistant", "content": "A noun names a thing." }
                ]
            }),
            &owner.token,
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["reply"], "Generated lesson text");
    assert_eq!(body["charged"], 1);

    let used = ctx
        .fixtures
        .get_usage(owner.user.id, ResourceKind::TutorMessages)
        .await
        .unwrap();
    assert_eq!(used, 1);
}
