use std::net::SocketAddr;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Sampling parameters sent with every generateContent call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Configuration for the assistant gateway
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Model credential; `None` means the gateway fails every call with a configuration error.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Number of prior turns forwarded to the model.
    pub history_window: usize,
    /// Answer locally with the onboarding reply when the portfolio is empty.
    pub require_portfolio: bool,
    pub generation: GenerationSettings,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            require_portfolio: true,
            generation: GenerationSettings::default(),
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let generation = GenerationSettings {
            temperature: env_parse("GEMINI_TEMPERATURE", defaults.generation.temperature),
            top_k: env_parse("GEMINI_TOP_K", defaults.generation.top_k),
            top_p: env_parse("GEMINI_TOP_P", defaults.generation.top_p),
            max_output_tokens: env_parse("GEMINI_MAX_OUTPUT_TOKENS", defaults.generation.max_output_tokens),
        };

        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            history_window: env_parse("CHAT_HISTORY_WINDOW", defaults.history_window),
            require_portfolio: env_parse("ASSISTANT_REQUIRE_PORTFOLIO", defaults.require_portfolio),
            generation,
        }
    }

    /// The credential, if one was provisioned and is not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid STORE_BACKEND: {}. Must be 'postgres' or 'memory'", s)),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub store_backend: StoreBackend,
    pub jwt_secret: Option<String>,
    pub assistant: AssistantConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid BIND_ADDR: {}", e))?;

        let store_backend = std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<StoreBackend>()?;

        let config = Self {
            bind_addr,
            database_url: std::env::var("DATABASE_URL").ok(),
            store_backend,
            jwt_secret: std::env::var("JWT_SECRET").ok(),
            assistant: AssistantConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.store_backend == StoreBackend::Postgres && self.database_url.is_none() {
            return Err("STORE_BACKEND is postgres but DATABASE_URL is not set".to_string());
        }
        if self.assistant.history_window == 0 {
            return Err("CHAT_HISTORY_WINDOW must be at least 1".to_string());
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
