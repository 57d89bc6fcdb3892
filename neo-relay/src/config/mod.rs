use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;

/// NASA's shared demo key, used outside production when no key is configured.
const NASA_DEMO_KEY: &str = "DEMO_KEY";

const DEFAULT_NASA_API_BASE: &str = "https://api.nasa.gov/neo/rest/v1";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub nasa: NasaConfig,
    pub gemini: GeminiConfig,
    pub cors: CorsConfig,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NasaConfig {
    pub api_key: Secret<String>,
    /// NeoWs REST root, e.g. `https://api.nasa.gov/neo/rest/v1`.
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    /// Model used for `generateContent` (e.g., gemini-2.5-pro)
    pub model: String,
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Allowed browser origin. `None` allows any origin.
    pub frontend_origin: Option<String>,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        Ok(RelayConfig {
            common,
            nasa: NasaConfig {
                api_key: Secret::new(get_env("NASA_API_KEY", Some(NASA_DEMO_KEY), is_prod)?),
                base_url: trim_base(get_env(
                    "NASA_API_BASE",
                    Some(DEFAULT_NASA_API_BASE),
                    false,
                )?),
            },
            gemini: GeminiConfig {
                api_key: Secret::new(get_env("GEMINI_API_KEY", Some(""), is_prod)?),
                base_url: trim_base(get_env(
                    "GEMINI_API_BASE",
                    Some(DEFAULT_GEMINI_API_BASE),
                    false,
                )?),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL), false)?,
            },
            cors: CorsConfig {
                frontend_origin: get_optional_env("FRONTEND_ORIGIN"),
            },
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
