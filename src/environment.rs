use std::env;

use crate::pipeline::TERM_BATCH_SIZE;

/// Default location of the index database.
pub const DEFAULT_DATABASE_PATH: &str = "onoma.db";

/// Retrieves an environment variable, falling back to a default when the
/// variable is unset or blank.
///
/// # Arguments
/// - `var`: The name of the environment variable.
/// - `default`: The value to use when the variable is not set.
///
/// # Returns
/// - `String`
pub fn get_env_var_or(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

/// Retrieves an environment variable parsed as `usize`, falling back to
/// a default when the variable is unset or not a number.
///
/// # Arguments
/// - `var`: The name of the environment variable.
/// - `default`: The value to use when the variable is not set.
///
/// # Returns
/// - `usize`
pub fn get_env_var_as_usize(var: &str, default: usize) -> usize {
    env::var(var)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Path of the index database.
pub fn database_path() -> String {
    get_env_var_or("ONOMA_DB", DEFAULT_DATABASE_PATH)
}

/// Filter directives for the stdout log layer.
pub fn log_filter() -> String {
    get_env_var_or("ONOMA_LOG", "info,sqlx=warn")
}

/// Number of concurrent extraction workers.
pub fn worker_count() -> usize {
    get_env_var_as_usize("ONOMA_WORKERS", 4)
}

/// Terms buffered per insert transaction.
pub fn term_batch_size() -> usize {
    get_env_var_as_usize("ONOMA_BATCH", TERM_BATCH_SIZE)
}
