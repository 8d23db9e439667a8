use anyhow::Context;
use serde::Deserialize;

/// Upper bound for any configured token lifetime (30 days).
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 30;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetConfig {
    pub ttl_minutes: i64,
    pub frontend_url: String,
    pub mail_from: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub cors_origins: Vec<String>,
    pub jwt: JwtConfig,
    pub reset: ResetConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => postgres_url_from_parts(&get),
        };

        let jwt = JwtConfig {
            secret: get("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "urbanlens".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "urbanlens-users".into()),
            ttl_minutes: ttl_or(&get, "JWT_TTL_MINUTES", 30)?,
        };

        let reset = ResetConfig {
            ttl_minutes: ttl_or(&get, "RESET_TOKEN_TTL_MINUTES", 60 * 24)?,
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            mail_from: get("MAIL_FROM").filter(|v| !v.trim().is_empty()),
        };

        let cors_origins = get("BACKEND_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let run_migrations = get("RUN_MIGRATIONS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(true);

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10),
            run_migrations,
            cors_origins,
            jwt,
            reset,
        })
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    get(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Token lifetimes must lie in `1..=MAX_TTL_MINUTES`.
fn ttl_or<F>(get: &F, key: &str, default: i64) -> anyhow::Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let minutes = parse_or(get, key, default);
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("{key} must be between 1 and {MAX_TTL_MINUTES} minutes, got {minutes}");
    }
    Ok(minutes)
}

fn postgres_url_from_parts<F>(get: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let server = get("POSTGRES_SERVER").unwrap_or_else(|| "localhost".into());
    let port = get("POSTGRES_PORT").unwrap_or_else(|| "5432".into());
    let user = get("POSTGRES_USER").unwrap_or_else(|| "urban_lens".into());
    let password = get("POSTGRES_PASSWORD").unwrap_or_else(|| "urban_lens".into());
    let db = get("POSTGRES_DB").unwrap_or_else(|| "urban_lens".into());
    format!("postgres://{user}:{password}@{server}:{port}/{db}")
}
