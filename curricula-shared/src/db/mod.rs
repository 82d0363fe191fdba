/// Database layer
///
/// - `pool`: connection pool construction and ping
/// - `migrations`: embedded sqlx migration runner
///
/// Models live in the `models` module at the crate root.
pub mod migrations;
pub mod pool;
