use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

use crate::engine::calendar::ReportingZone;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_clock_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Offset of the reporting day from UTC, in minutes.
    pub report_utc_offset_minutes: i32,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key} value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_issuer: or_default("JWT_ISSUER", "qr-attendance".to_string())?,
            access_token_ttl: or_default("ACCESS_TOKEN_TTL", 1800)?, // 30 min

            rate_login_per_min: or_default("RATE_LOGIN_PER_MIN", 60)?,
            rate_clock_per_min: or_default("RATE_CLOCK_PER_MIN", 120)?,
            rate_protected_per_min: or_default("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: or_default("API_PREFIX", "/api".to_string())?,

            report_utc_offset_minutes: or_default("REPORT_UTC_OFFSET_MINUTES", 540)?, // +09:00
        };

        config.reporting_zone()?;
        Ok(config)
    }

    pub fn reporting_zone(&self) -> Result<ReportingZone> {
        ReportingZone::from_offset_minutes(self.report_utc_offset_minutes).ok_or_else(|| {
            anyhow!(
                "REPORT_UTC_OFFSET_MINUTES out of range: {}",
                self.report_utc_offset_minutes
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let v: u32 = or_default("QR_ATTENDANCE_TEST_UNSET_KEY", 42).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn offset_outside_a_day_is_rejected() {
        let mut config = Config {
            database_url: String::new(),
            jwt_secret: String::new(),
            jwt_issuer: String::new(),
            server_addr: String::new(),
            access_token_ttl: 0,
            rate_login_per_min: 0,
            rate_clock_per_min: 0,
            rate_protected_per_min: 0,
            api_prefix: "/api".into(),
            report_utc_offset_minutes: 540,
        };
        assert!(config.reporting_zone().is_ok());
        config.report_utc_offset_minutes = 24 * 60;
        assert!(config.reporting_zone().is_err());
    }
}
