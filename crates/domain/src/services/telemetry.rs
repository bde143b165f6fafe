use std::{
    env,
    net::{AddrParseError, SocketAddr},
    sync::Arc,
};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use crate::config::hydrate_env_file;

static SUBSCRIBER: OnceCell<()> = OnceCell::new();
static RECORDER: OnceCell<Arc<PrometheusHandle>> = OnceCell::new();

/// Observability options for the binary.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    log_filter: String,
    metrics_address: Option<String>,
}

impl TelemetryConfig {
    /// Loads telemetry knobs from optional environment variables prefixed with
    /// `<PREFIX>_`, e.g. `API_LOG_FILTER`. Missing entries fall back to
    /// defaults so the binary boots without extra configuration.
    pub fn from_env(prefix: &str) -> Self {
        let _ = hydrate_env_file();
        let upper = prefix.trim().to_ascii_uppercase();
        let log_key = format!("{}_LOG_FILTER", upper);
        let metrics_key = format!("{}_METRICS_ADDRESS", upper);

        let log_filter = env::var(log_key)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());
        let metrics_address = env::var(metrics_key).ok().and_then(|value| {
            if value.trim().is_empty() {
                None
            } else {
                Some(value)
            }
        });

        Self {
            log_filter,
            metrics_address,
        }
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn metrics_address(&self) -> Option<&str> {
        self.metrics_address.as_deref()
    }
}

/// Handle to the process-wide Prometheus recorder.
#[derive(Clone)]
pub struct TelemetryGuard {
    recorder: Arc<PrometheusHandle>,
}

impl TelemetryGuard {
    /// Renders every recorded metric in the Prometheus text format.
    pub fn render_metrics(&self) -> String {
        self.recorder.render()
    }
}

/// Installs the tracing subscriber and the Prometheus recorder on first use.
/// Later calls hand back the recorder installed by the first one.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    SUBSCRIBER.get_or_try_init(|| -> Result<(), TelemetryError> {
        let filter = EnvFilter::try_new(config.log_filter())?;
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?;
        Ok(())
    })?;

    let recorder = RECORDER.get_or_try_init(|| -> Result<_, TelemetryError> {
        let mut builder = PrometheusBuilder::new();
        if let Some(addr) = config.metrics_address() {
            let listen = addr
                .parse::<SocketAddr>()
                .map_err(|source| TelemetryError::MetricsAddress {
                    addr: addr.to_owned(),
                    source,
                })?;
            builder = builder.with_http_listener(listen);
        }
        Ok(Arc::new(builder.install_recorder()?))
    })?;

    Ok(TelemetryGuard {
        recorder: Arc::clone(recorder),
    })
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    LogFilter(#[from] ParseError),
    #[error("tracing subscriber already set: {0}")]
    Subscriber(#[from] TryInitError),
    #[error("invalid metrics address `{addr}`: {source}")]
    MetricsAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },
    #[error("failed to install metrics recorder: {0}")]
    Recorder(#[from] BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn telemetry_config_uses_defaults() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("PHONE_REGISTRY_SKIP_DOTENV", "1");
        env::remove_var("TELEMETRY_TEST_LOG_FILTER");
        env::remove_var("TELEMETRY_TEST_METRICS_ADDRESS");

        let cfg = TelemetryConfig::from_env("telemetry_test");
        assert_eq!(cfg.log_filter(), "info");
        assert_eq!(cfg.metrics_address(), None);
    }

    #[test]
    fn telemetry_config_reads_env() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("PHONE_REGISTRY_SKIP_DOTENV", "1");
        env::set_var("TELEMETRY_TEST_LOG_FILTER", "debug");
        env::set_var("TELEMETRY_TEST_METRICS_ADDRESS", "127.0.0.1:9898");

        let cfg = TelemetryConfig::from_env("TELEMETRY_TEST");
        assert_eq!(cfg.log_filter(), "debug");
        assert_eq!(cfg.metrics_address(), Some("127.0.0.1:9898"));

        env::remove_var("TELEMETRY_TEST_LOG_FILTER");
        env::remove_var("TELEMETRY_TEST_METRICS_ADDRESS");
    }

    #[test]
    fn empty_metrics_address_is_treated_as_none() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("PHONE_REGISTRY_SKIP_DOTENV", "1");
        env::set_var("TELEMETRY_TEST_METRICS_ADDRESS", "  ");

        let cfg = TelemetryConfig::from_env("TELEMETRY_TEST");
        assert_eq!(cfg.metrics_address(), None);

        env::remove_var("TELEMETRY_TEST_METRICS_ADDRESS");
    }

    #[test]
    fn unparsable_metrics_address_is_rejected() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("PHONE_REGISTRY_SKIP_DOTENV", "1");
        env::set_var("TELEMETRY_TEST_METRICS_ADDRESS", "not-an-address");

        let cfg = TelemetryConfig::from_env("TELEMETRY_TEST");
        let err = init_telemetry(&cfg).err().unwrap();
        assert!(matches!(
            err,
            TelemetryError::MetricsAddress { ref addr, .. } if addr == "not-an-address"
        ));

        env::remove_var("TELEMETRY_TEST_METRICS_ADDRESS");
    }
}
