use std::env;

use anyhow::{bail, Context};

use crate::services::reporting::ZeroRepsPolicy;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub zero_reps_policy: ZeroRepsPolicy,
    /// Days covered by list and dashboard reads that omit `from`. `None` is unbounded.
    pub default_range_days: Option<u32>,
    pub session_ttl_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:trainlog.db?mode=rwc".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            zero_reps_policy: ZeroRepsPolicy::default(),
            default_range_days: Some(90),
            session_ttl_days: 7,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(v) => v.parse().with_context(|| format!("invalid PORT: {v}"))?,
            Err(_) => defaults.port,
        };

        let zero_reps_policy = match env::var("ZERO_REPS_POLICY") {
            Ok(v) => ZeroRepsPolicy::parse(&v)
                .with_context(|| format!("invalid ZERO_REPS_POLICY: {v}"))?,
            Err(_) => defaults.zero_reps_policy,
        };

        let default_range_days = match env::var("DEFAULT_RANGE_DAYS") {
            Ok(v) => parse_range_days(&v)?,
            Err(_) => defaults.default_range_days,
        };

        let session_ttl_days = match env::var("SESSION_TTL_DAYS") {
            Ok(v) => parse_ttl_days(&v)?,
            Err(_) => defaults.session_ttl_days,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            zero_reps_policy,
            default_range_days,
            session_ttl_days,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_range_days(value: &str) -> anyhow::Result<Option<u32>> {
    let days: u32 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid DEFAULT_RANGE_DAYS: {value}"))?;
    Ok((days > 0).then_some(days))
}

/// Session lifetime in days. Must be positive and small enough that
/// `now + ttl` stays a valid timestamp.
fn parse_ttl_days(value: &str) -> anyhow::Result<i64> {
    let days: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid SESSION_TTL_DAYS: {value}"))?;
    if days <= 0 {
        bail!("SESSION_TTL_DAYS must be positive, got {days}");
    }
    let fits = chrono::Duration::try_days(days)
        .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
        .is_some();
    if !fits {
        bail!("SESSION_TTL_DAYS out of range: {days}");
    }
    Ok(days)
}
