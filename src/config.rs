//! Service configuration, read from environment variables.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{DEFAULT_BASE_URL as GEMINI_BASE_URL, DEFAULT_MODEL, LlmConfig};
use crate::sessions::CorsOrigins;
use crate::survey::ScoringMode;
use crate::warehouse::{DEFAULT_DATASET, DEFAULT_TABLE, TableRef, WarehouseConfig, bigquery};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default idle session timeout in minutes.
pub const DEFAULT_SESSION_IDLE_MIN: u32 = 60;
/// Default local warehouse file.
pub const DEFAULT_DB_PATH: &str = "./data/assessments.db";

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub session_idle_min: u32,
    pub scoring: ScoringMode,
    pub llm: LlmConfig,
    pub warehouse: WarehouseConfig,
    pub table: TableRef,
    pub cors: CorsOrigins,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var("GEMINI_API_KEY").ok_or_else(|| ConfigError::MissingRequired {
            key: "GEMINI_API_KEY".to_string(),
            hint: "export GEMINI_API_KEY=<your Gemini API key>".to_string(),
        })?;
        let llm = LlmConfig {
            api_key: SecretString::from(api_key),
            model: var("PHARMA_MATURITY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: var("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
        };

        let port = parse_or(var("PHARMA_MATURITY_PORT"), "PHARMA_MATURITY_PORT", DEFAULT_PORT)?;
        let session_idle_min = parse_or(
            var("PHARMA_MATURITY_SESSION_IDLE_MIN"),
            "PHARMA_MATURITY_SESSION_IDLE_MIN",
            DEFAULT_SESSION_IDLE_MIN,
        )?;
        if session_idle_min == 0 {
            return Err(ConfigError::InvalidValue {
                key: "PHARMA_MATURITY_SESSION_IDLE_MIN".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let scoring = match var("SURVEY_SCORING_MODE") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "SURVEY_SCORING_MODE".to_string(),
                message,
            })?,
            None => ScoringMode::default(),
        };

        let warehouse = match var("GOOGLE_APPLICATION_CREDENTIALS") {
            Some(credentials) => WarehouseConfig::BigQuery {
                credentials_path: PathBuf::from(credentials),
                project: var("BIGQUERY_PROJECT"),
                base_url: var("BIGQUERY_BASE_URL")
                    .unwrap_or_else(|| bigquery::DEFAULT_BASE_URL.to_string()),
            },
            None => WarehouseConfig::LibSql {
                path: PathBuf::from(
                    var("PHARMA_MATURITY_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
                ),
            },
        };

        let table = TableRef::new(
            var("BIGQUERY_DATASET").unwrap_or_else(|| DEFAULT_DATASET.to_string()),
            var("BIGQUERY_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
        );

        let cors = match var("PHARMA_MATURITY_CORS_ORIGINS").as_deref() {
            None => CorsOrigins::LocalhostOnly,
            Some("*") => CorsOrigins::Any,
            Some(list) => CorsOrigins::List(
                list.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
        };

        Ok(Self {
            port,
            session_idle_min,
            scoring,
            llm,
            warehouse,
            table,
            cors,
        })
    }

    pub fn session_idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.session_idle_min))
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_api_key() {
        let config = load(&[("GEMINI_API_KEY", "k-123")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_idle_min, 60);
        assert_eq!(config.scoring, ScoringMode::Recompute);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.llm.api_key.expose_secret(), "k-123");
        assert_eq!(config.table, TableRef::new("audit", "auditplus"));
        assert_eq!(config.cors, CorsOrigins::LocalhostOnly);
        match config.warehouse {
            WarehouseConfig::LibSql { path } => assert_eq!(path, PathBuf::from("./data/assessments.db")),
            other => panic!("unexpected warehouse {other:?}"),
        }
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { ref key, .. } if key == "GEMINI_API_KEY"));
        assert!(load(&[("GEMINI_API_KEY", "   ")]).is_err());
    }

    #[test]
    fn credentials_file_selects_bigquery() {
        let config = load(&[
            ("GEMINI_API_KEY", "k"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/etc/pharma/sa.json"),
            ("BIGQUERY_DATASET", "audit_eu"),
        ])
        .unwrap();
        match config.warehouse {
            WarehouseConfig::BigQuery {
                credentials_path,
                project,
                base_url,
            } => {
                assert_eq!(credentials_path, PathBuf::from("/etc/pharma/sa.json"));
                assert_eq!(project, None);
                assert_eq!(base_url, "https://bigquery.googleapis.com");
            }
            other => panic!("unexpected warehouse {other:?}"),
        }
        assert_eq!(config.table.to_string(), "audit_eu.auditplus");
    }

    #[test]
    fn project_override_applies_only_with_credentials() {
        let config = load(&[
            ("GEMINI_API_KEY", "k"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "sa.json"),
            ("BIGQUERY_PROJECT", "acme-analytics"),
        ])
        .unwrap();
        assert!(matches!(
            config.warehouse,
            WarehouseConfig::BigQuery { project: Some(ref p), .. } if p == "acme-analytics"
        ));

        let local = load(&[("GEMINI_API_KEY", "k"), ("BIGQUERY_PROJECT", "acme-analytics")]).unwrap();
        assert!(matches!(local.warehouse, WarehouseConfig::LibSql { .. }));
    }

    #[test]
    fn scoring_mode_and_numbers_are_validated() {
        let config = load(&[("GEMINI_API_KEY", "k"), ("SURVEY_SCORING_MODE", "Accumulate")]).unwrap();
        assert_eq!(config.scoring, ScoringMode::Accumulate);

        assert!(load(&[("GEMINI_API_KEY", "k"), ("SURVEY_SCORING_MODE", "twice")]).is_err());
        assert!(load(&[("GEMINI_API_KEY", "k"), ("PHARMA_MATURITY_PORT", "eighty")]).is_err());
        assert!(load(&[("GEMINI_API_KEY", "k"), ("PHARMA_MATURITY_SESSION_IDLE_MIN", "0")]).is_err());
    }

    #[test]
    fn cors_origins_parse() {
        let any = load(&[("GEMINI_API_KEY", "k"), ("PHARMA_MATURITY_CORS_ORIGINS", "*")]).unwrap();
        assert_eq!(any.cors, CorsOrigins::Any);

        let list = load(&[
            ("GEMINI_API_KEY", "k"),
            ("PHARMA_MATURITY_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();
        assert_eq!(
            list.cors,
            CorsOrigins::List(vec!["https://a.example".into(), "https://b.example".into()])
        );
    }

    #[test]
    fn idle_timeout_in_minutes() {
        let config = load(&[("GEMINI_API_KEY", "k"), ("PHARMA_MATURITY_SESSION_IDLE_MIN", "15")]).unwrap();
        assert_eq!(config.session_idle_timeout(), chrono::Duration::minutes(15));
    }
}
