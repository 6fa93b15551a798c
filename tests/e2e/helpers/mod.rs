use academy_backend::domain::auth::Role;
use academy_backend::domain::organization::{Organization, Plan};
use academy_backend::domain::user::User;
use academy_backend::infrastructure::config::{Config, Environment, LogFormat};
use once_cell::sync::Lazy;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio::net::TcpListener;
use uuid::Uuid;

pub mod db_pool;
pub mod fakes;
pub mod fixtures;

use api_client::TestClient;
use db_pool::{DatabasePool, PooledDatabase};
use fakes::{FakeAiGateway, FakeEmailGateway};
use fixtures::TestFixtures;

// Docker client for test containers
static DOCKER: Lazy<Cli> = Lazy::new(Cli::default);

// Shared PostgreSQL container for all tests
static SHARED_CONTAINER: Lazy<SharedContainer> = Lazy::new(SharedContainer::new);

// Global database pool
static DB_POOL: Lazy<DatabasePool> = Lazy::new(|| DatabasePool::new(SHARED_CONTAINER.port));

/// Shared container that lives for the duration of all tests
struct SharedContainer {
    _container: Container<'static, Postgres>,
    port: u16,
}

impl SharedContainer {
    fn new() -> Self {
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        println!("🐳 Started shared PostgreSQL container on port {}", port);

        Self {
            _container: container,
            port,
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    #[allow(dead_code)]
    pub pool: PgPool,
    pub config: Config,
    pub fixtures: TestFixtures,
    pub ai_gateway: Arc<FakeAiGateway>,
    pub email_gateway: Arc<FakeEmailGateway>,
    _db: PooledDatabase,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            // Get a database from the shared pool
            let pooled_db = DB_POOL
                .get_database()
                .await
                .expect("Failed to get database from pool");

            let config = Config {
                database_url: pooled_db.database_url.clone(),
                database_max_connections: 5,
                host: "127.0.0.1".to_string(),
                port: 0, // Will be assigned by the OS
                jwt_secret: "test-jwt-secret-key-for-testing-only".to_string(),
                environment: Environment::Development,
                log_format: LogFormat::Pretty,
                openai_api_key: "test-openai-key".to_string(),
                ai_text_model: "gpt-4o-mini".to_string(),
                ai_image_model: "dall-e-3".to_string(),
                email_api_url: "http://localhost:0".to_string(),
                email_api_key: "test-email-key".to_string(),
                email_from: "Academy <noreply@academy.test>".to_string(),
                quota_policy_cache_ttl_secs: 0, // Grants must be visible immediately
                upstream_timeout_secs: 5,
            };

            let ai_gateway = Arc::new(FakeAiGateway::default());
            let email_gateway = Arc::new(FakeEmailGateway::default());

            let app = create_app_with_fake_gateways(
                config.clone(),
                pooled_db.pool.clone(),
                ai_gateway.clone(),
                email_gateway.clone(),
            );

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            let client = TestClient::new(&base_url);
            let fixtures = TestFixtures::new(pooled_db.pool.clone());

            Self {
                client,
                pool: pooled_db.pool.clone(),
                config,
                fixtures,
                ai_gateway,
                email_gateway,
                _db: pooled_db,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Database cleanup happens automatically via Drop on PooledDatabase
        }
    }
}

/// A member of a test academy with a valid token
pub struct TestMember {
    pub user: User,
    pub token: String,
}

impl TestContext {
    /// Create an academy on `plan` together with its owner
    pub async fn academy(&self, plan: Plan) -> (Organization, TestMember) {
        let organization = self.fixtures.create_organization(plan).await.unwrap();
        let owner = self
            .member(&organization, &format!("owner-{}@academy.test", organization.id), Role::Owner)
            .await;
        (organization, owner)
    }

    pub async fn member(&self, organization: &Organization, email: &str, role: Role) -> TestMember {
        let user = self
            .fixtures
            .create_member(organization.id, email, role)
            .await
            .unwrap();
        let token = generate_test_jwt(&user.id, &organization.id, role, &self.config.jwt_secret);
        TestMember { user, token }
    }
}

/// Production wiring with the provider gateways swapped for in-process fakes
fn create_app_with_fake_gateways(
    config: Config,
    pool: PgPool,
    ai_gateway: Arc<FakeAiGateway>,
    email_gateway: Arc<FakeEmailGateway>,
) -> axum::Router {
    use academy_backend::{
        controllers::{
            ai::AiController, billing::BillingController, credits::CreditController,
            email::EmailController, lesson::LessonController, student::StudentController,
            tutor::TutorController, usage::UsageController,
        },
        domain::{
            ai::AiService, billing::BillingService, content::ContentService,
            credits::CreditService, email::EmailService,
            quota::{PolicyResolver, QuotaGate},
            student::StudentService, tutor::TutorService, usage::UsageService,
        },
        infrastructure::{
            http::{build_router, Controllers},
            repositories::{
                LessonBlockRepository, OrganizationRepository, UsageRepository, UserRepository,
            },
        },
    };

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let org_repo = Arc::new(OrganizationRepository::new(pool.clone()));
    let usage_repo = Arc::new(UsageRepository::new(pool.clone()));
    let block_repo = Arc::new(LessonBlockRepository::new(pool.clone()));

    let policies = Arc::new(PolicyResolver::new(org_repo.clone(), config.policy_cache_ttl()));
    let gate = Arc::new(
        QuotaGate::new(policies.clone(), usage_repo.clone())
            .with_upstream_timeout(config.upstream_timeout()),
    );

    let controllers = Controllers {
        ai: Arc::new(AiController::new(Arc::new(AiService::new(
            gate.clone(),
            ai_gateway.clone(),
        )))),
        email: Arc::new(EmailController::new(Arc::new(EmailService::new(
            gate.clone(),
            email_gateway,
        )))),
        tutor: Arc::new(TutorController::new(Arc::new(TutorService::new(
            gate.clone(),
            ai_gateway,
        )))),
        student: Arc::new(StudentController::new(Arc::new(StudentService::new(
            gate.clone(),
            user_repo.clone(),
            usage_repo.clone(),
        )))),
        usage: Arc::new(UsageController::new(Arc::new(UsageService::new(
            usage_repo.clone(),
        )))),
        credit: Arc::new(CreditController::new(Arc::new(CreditService::new(
            org_repo.clone(),
            policies,
        )))),
        billing: Arc::new(BillingController::new(Arc::new(BillingService::new(
            org_repo,
        )))),
        lesson: Arc::new(LessonController::new(Arc::new(ContentService::new(
            block_repo,
        )))),
    };

    build_router(pool, config, user_repo, controllers)
}

// Helper to generate valid JWT tokens for testing
pub fn generate_test_jwt(
    user_id: &Uuid,
    organization_id: &Uuid,
    role: Role,
    secret: &str,
) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        org: String,
        role: Role,
        email: String,
        exp: i64,
        iat: i64,
    }

    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        org: organization_id.to_string(),
        role,
        email: "test@example.com".to_string(),
        exp: (now + chrono::Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
