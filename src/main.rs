use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use academy_backend::controllers::{
    ai::AiController, billing::BillingController, credits::CreditController,
    email::EmailController, lesson::LessonController, student::StudentController,
    tutor::TutorController, usage::UsageController,
};
use academy_backend::domain::{
    ai::AiService, billing::BillingService, content::ContentService, credits::CreditService,
    email::EmailService, quota::{PolicyResolver, QuotaGate}, student::StudentService,
    tutor::TutorService, usage::UsageService,
};
use academy_backend::infrastructure::config::{Config, LogFormat};
use academy_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use academy_backend::infrastructure::gateways::{AiGateway, EmailGateway, OpenAiGateway, ResendEmailGateway};
use academy_backend::infrastructure::http::{build_router, start_http_server, Controllers};
use academy_backend::infrastructure::repositories::{
    LessonBlockRepository, OrganizationRepository, UsageRepository, UserRepository,
};
use async_openai::{config::OpenAIConfig, Client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Academy Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database connection pool created");

    check_connection(&pool).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database connection verified and migrations applied");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    tracing::info!("Instantiating repositories...");
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let org_repo = Arc::new(OrganizationRepository::new(pool.clone()));
    let usage_repo = Arc::new(UsageRepository::new(pool.clone()));
    let block_repo = Arc::new(LessonBlockRepository::new(pool.clone()));

    // 2. Gateways
    tracing::info!(
        text_model = %config.ai_text_model,
        image_model = %config.ai_image_model,
        "Instantiating provider gateways..."
    );
    let openai_client = Arc::new(Client::with_config(
        OpenAIConfig::new().with_api_key(config.openai_api_key.clone()),
    ));
    let ai_gateway: Arc<dyn AiGateway> = Arc::new(OpenAiGateway::new(
        openai_client,
        config.ai_text_model.clone(),
        config.ai_image_model.clone(),
    ));
    let email_gateway: Arc<dyn EmailGateway> = Arc::new(ResendEmailGateway::new(
        config.email_api_url.clone(),
        config.email_api_key.clone(),
        config.email_from.clone(),
    ));

    // 3. Quota gate
    let policies = Arc::new(PolicyResolver::new(org_repo.clone(), config.policy_cache_ttl()));
    let gate = Arc::new(
        QuotaGate::new(policies.clone(), usage_repo.clone())
            .with_upstream_timeout(config.upstream_timeout()),
    );

    // 4. Services
    tracing::info!("Instantiating services...");
    let ai_service = Arc::new(AiService::new(gate.clone(), ai_gateway.clone()));
    let email_service = Arc::new(EmailService::new(gate.clone(), email_gateway));
    let tutor_service = Arc::new(TutorService::new(gate.clone(), ai_gateway));
    let student_service = Arc::new(StudentService::new(
        gate.clone(),
        user_repo.clone(),
        usage_repo.clone(),
    ));
    let usage_service = Arc::new(UsageService::new(usage_repo.clone()));
    let credit_service = Arc::new(CreditService::new(org_repo.clone(), policies));
    let billing_service = Arc::new(BillingService::new(org_repo));
    let content_service = Arc::new(ContentService::new(block_repo));

    // 5. Controllers
    tracing::info!("Instantiating controllers...");
    let controllers = Controllers {
        ai: Arc::new(AiController::new(ai_service)),
        email: Arc::new(EmailController::new(email_service)),
        tutor: Arc::new(TutorController::new(tutor_service)),
        student: Arc::new(StudentController::new(student_service)),
        usage: Arc::new(UsageController::new(usage_service)),
        credit: Arc::new(CreditController::new(credit_service)),
        billing: Arc::new(BillingController::new(billing_service)),
        lesson: Arc::new(LessonController::new(content_service)),
    };

    let app = build_router(pool, config.clone(), user_repo, controllers);
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "academy_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "academy_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
