pub mod lesson_block_repository;
pub mod organization_repository;
pub mod policy_repository;
pub mod usage_counter_repository;
pub mod usage_repository;
pub mod user_repository;

pub use lesson_block_repository::LessonBlockRepository;
pub use organization_repository::OrganizationRepository;
pub use policy_repository::PolicyRepository;
pub use usage_counter_repository::UsageCounterRepository;
pub use usage_repository::{UsageRecord, UsageRepository, UsageSnapshot};
pub use user_repository::UserRepository;
