use vatic_core::error::CoreError;
use vatic_core::planning::{DEFAULT_SEGMENT_LENGTH, DEFAULT_SEGMENT_OVERLAP};

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Connection pool size (default: `5`).
    pub db_max_connections: u32,
    /// Default `load --length` (default: `300`).
    pub segment_length: i32,
    /// Default `load --overlap` (default: `20`).
    pub segment_overlap: i32,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `DATABASE_URL`          | required|
    /// | `DB_MAX_CONNECTIONS`    | `5`     |
    /// | `VATIC_SEGMENT_LENGTH`  | `300`   |
    /// | `VATIC_SEGMENT_OVERLAP` | `20`    |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| CoreError::Validation("DATABASE_URL must be set".into()))?;

        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let segment_length = parse_or(&lookup, "VATIC_SEGMENT_LENGTH", DEFAULT_SEGMENT_LENGTH)?;
        let segment_overlap =
            parse_or(&lookup, "VATIC_SEGMENT_OVERLAP", DEFAULT_SEGMENT_OVERLAP)?;

        if db_max_connections == 0 {
            return Err(CoreError::Validation(
                "DB_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }
        if segment_length <= 0 {
            return Err(CoreError::Validation(format!(
                "VATIC_SEGMENT_LENGTH must be > 0, got {segment_length}"
            )));
        }
        if segment_overlap < 0 {
            return Err(CoreError::Validation(format!(
                "VATIC_SEGMENT_OVERLAP must be >= 0, got {segment_overlap}"
            )));
        }

        Ok(Self {
            database_url,
            db_max_connections,
            segment_length,
            segment_overlap,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CoreError::Validation(format!("{key} must be a valid number, got '{raw}'"))
        }),
    }
}
