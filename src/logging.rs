use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("LOKI_ENABLED is set but LOKI_URL is missing")]
    MissingLokiUrl,
    #[error("Invalid log filter '{0}'")]
    Filter(String),
    #[cfg(feature = "loki")]
    #[error("Invalid LOKI_URL: {0}")]
    LokiUrl(#[from] url::ParseError),
    #[cfg(feature = "loki")]
    #[error("Loki layer: {0}")]
    Loki(#[from] tracing_loki::Error),
    #[error("Subscriber already installed: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Where log lines go and how they are labelled.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Loki push endpoint. Logs stay console-only when absent.
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    /// `EnvFilter` directive, e.g. `info` or `coinfolio_backend=debug,sqlx=warn`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            loki_url: None,
            service_name: "coinfolio".to_string(),
            environment: "development".to_string(),
            filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, LoggingError> {
        let defaults = Self::default();
        let loki_url = std::env::var("LOKI_URL").ok().filter(|url| !url.trim().is_empty());
        let loki_enabled = std::env::var("LOKI_ENABLED").map(|v| is_truthy(&v)).unwrap_or(false);

        if loki_enabled && loki_url.is_none() {
            return Err(LoggingError::MissingLokiUrl);
        }

        Ok(Self {
            loki_url: if loki_enabled { loki_url } else { None },
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            filter: std::env::var("RUST_LOG").unwrap_or(defaults.filter),
        })
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.filter).map_err(|_| LoggingError::Filter(self.filter.clone()))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Installs the global subscriber: console output always, Loki when configured.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(fmt::layer().with_target(false));
    #[cfg(feature = "loki")]
    let registry = registry.with(loki_layer(config)?);
    registry.try_init()?;

    #[cfg(not(feature = "loki"))]
    {
        if config.loki_url.is_some() {
            tracing::warn!("LOKI_URL ignored: built without the `loki` feature");
        }
    }

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        loki = config.loki_url.is_some(),
        "Logging initialized"
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(config: &LoggingConfig) -> Result<Option<tracing_loki::Layer>, LoggingError> {
    let Some(loki_url) = config.loki_url.as_deref() else {
        return Ok(None);
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url::Url::parse(loki_url)?)?;
    tokio::spawn(task);

    Ok(Some(layer))
}
