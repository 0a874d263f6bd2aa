use crate::{env_flag, env_or};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub metrics_port: u16,
    /// Prometheus recorder and HTTP metrics middleware.
    pub observability_enabled: bool,
    /// OTLP span export.
    pub otel_enabled: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 3000),
            metrics_port: env_or("METRICS_PORT", 9090),
            observability_enabled: env_flag("OBSERVABILITY_ENABLED", true),
            otel_enabled: env_flag("OTEL_ENABLED", false),
        }
    }
}
