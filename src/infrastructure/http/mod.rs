use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::{
    controllers::{
        ai::AiController, billing::BillingController, credits::CreditController,
        email::EmailController, health, lesson::LessonController, student::StudentController,
        tutor::TutorController, usage::UsageController,
    },
    infrastructure::auth::{auth_middleware, request_id_middleware},
};

use crate::infrastructure::repositories::UserRepository;

/// Every controller the router dispatches to
pub struct Controllers {
    pub ai: Arc<AiController>,
    pub email: Arc<EmailController>,
    pub tutor: Arc<TutorController>,
    pub student: Arc<StudentController>,
    pub usage: Arc<UsageController>,
    pub credit: Arc<CreditController>,
    pub billing: Arc<BillingController>,
    pub lesson: Arc<LessonController>,
}

/// Build the application router with all routes configured
pub fn build_router(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    user_repo: Arc<UserRepository>,
    controllers: Controllers,
) -> Router {
    let auth = || middleware::from_fn_with_state((user_repo.clone(), config.clone()), auth_middleware);

    // AI generation routes (ai_credits)
    let ai_routes = Router::new()
        .route("/api/ai/text", post(AiController::generate_text))
        .route("/api/ai/image", post(AiController::generate_image))
        .route("/api/ai/quiz", post(AiController::generate_quiz))
        .with_state(controllers.ai)
        .layer(auth());

    // Email routes (email_credits)
    let email_routes = Router::new()
        .route("/api/emails", post(EmailController::send))
        .with_state(controllers.email)
        .layer(auth());

    // Tutor routes (tutor_messages, per user)
    let tutor_routes = Router::new()
        .route("/api/tutor/messages", post(TutorController::send_message))
        .with_state(controllers.tutor)
        .layer(auth());

    // Student routes (student_seats)
    let student_routes = Router::new()
        .route("/api/students", post(StudentController::add_student))
        .route("/api/students/capacity", get(StudentController::capacity))
        .with_state(controllers.student)
        .layer(auth());

    let usage_routes = Router::new()
        .route("/api/usage", get(UsageController::get_usage))
        .route("/api/usage/:resource", get(UsageController::get_resource_usage))
        .with_state(controllers.usage)
        .layer(auth());

    let credit_routes = Router::new()
        .route("/api/credits/grants", post(CreditController::grant))
        .with_state(controllers.credit)
        .layer(auth());

    let billing_routes = Router::new()
        .route("/api/billing/checkout-quote", post(BillingController::checkout_quote))
        .with_state(controllers.billing)
        .layer(auth());

    let lesson_routes = Router::new()
        .route(
            "/api/lessons/:lesson_id/blocks",
            get(LessonController::list_blocks).put(LessonController::upsert_block),
        )
        .with_state(controllers.lesson)
        .layer(auth());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(ai_routes)
        .merge(email_routes)
        .merge(tutor_routes)
        .merge(student_routes)
        .merge(usage_routes)
        .merge(credit_routes)
        .merge(billing_routes)
        .merge(lesson_routes)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http()),
        )
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
