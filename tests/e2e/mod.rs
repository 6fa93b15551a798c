// End-to-end integration tests for the Academy Backend API
//
// These tests use a shared testcontainers PostgreSQL instance with a database
// pool for test isolation. Each test receives its own isolated database from
// the pool, allowing tests to run in parallel without conflicts.
//
// Architecture:
// - One shared PostgreSQL container for the entire test suite
// - Database pool creates/manages isolated databases (test_db_<uuid>)
// - Each test gets a unique database via test-context lifecycle hooks
// - AI and email providers are in-process fakes behind the production traits
// - Databases are cleaned and recycled after test completion

mod helpers;
mod test_ai;
mod test_credits;
mod test_health;
