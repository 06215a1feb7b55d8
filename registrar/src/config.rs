use std::str::FromStr;
use std::time;

use envconfig::Envconfig;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_SERVICE_NAME: &str = "GO-SERVICE";
pub const DEFAULT_SERVICE_PORT: &str = "8083";
pub const DEFAULT_EUREKA_SERVER: &str = "http://discovery-server:8761/eureka/";

/// Service configuration, read from the environment.
///
/// `SERVICE_NAME`, `SERVICE_PORT` and `EUREKA_SERVER` fall back to their defaults
/// when unset or empty, so they are kept raw here and resolved through the
/// accessors below.
#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(from = "BIND_HOST", default = "0.0.0.0")]
    pub host: String,

    #[envconfig(from = "SERVICE_NAME")]
    pub service_name: Option<String>,

    /// Port the HTTP server listens on. Advertised to the registry verbatim.
    #[envconfig(from = "SERVICE_PORT")]
    pub service_port: Option<String>,

    /// Base URL of the Eureka server, e.g. `http://discovery-server:8761/eureka/`.
    #[envconfig(from = "EUREKA_SERVER")]
    pub eureka_server: Option<String>,

    #[envconfig(default = "5000")]
    pub registration_retry_delay: EnvMsDuration,

    #[envconfig(default = "30000")]
    pub renewal_interval: EnvMsDuration,

    #[envconfig(default = "5000")]
    pub request_timeout: EnvMsDuration,

    #[envconfig(default = "true")]
    pub export_prometheus: bool,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

impl Config {
    /// Produce a host:port address for binding a TcpListener.
    pub fn bind(&self) -> Result<String, ConfigError> {
        Ok(format!("{}:{}", self.host, self.port()?))
    }

    pub fn service_name(&self) -> &str {
        or_default(&self.service_name, DEFAULT_SERVICE_NAME)
    }

    /// The port exactly as configured, which is what the instance id is built from.
    pub fn service_port(&self) -> &str {
        or_default(&self.service_port, DEFAULT_SERVICE_PORT)
    }

    pub fn port(&self) -> Result<u16, ConfigError> {
        let port = self.service_port();
        port.parse()
            .map_err(|_| ConfigError::InvalidPort(port.to_owned()))
    }

    pub fn eureka_server(&self) -> Result<Url, ConfigError> {
        let value = or_default(&self.eureka_server, DEFAULT_EUREKA_SERVER);
        Url::parse(value).map_err(|source| ConfigError::InvalidRegistryUrl {
            value: value.to_owned(),
            source,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvMsDuration(pub time::Duration);

#[derive(Debug, PartialEq, Eq)]
pub struct ParseEnvMsDurationError;

impl FromStr for EnvMsDuration {
    type Err = ParseEnvMsDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ms = s.parse::<u64>().map_err(|_| ParseEnvMsDurationError)?;

        Ok(EnvMsDuration(time::Duration::from_millis(ms)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Config {
        let env = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::init_from_hashmap(&env).expect("failed to load config")
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]);

        assert_eq!(config.service_name(), "GO-SERVICE");
        assert_eq!(config.service_port(), "8083");
        assert_eq!(config.port().unwrap(), 8083);
        assert_eq!(
            config.eureka_server().unwrap().as_str(),
            "http://discovery-server:8761/eureka/"
        );
        assert_eq!(
            config.registration_retry_delay,
            EnvMsDuration(time::Duration::from_secs(5))
        );
        assert_eq!(
            config.renewal_interval,
            EnvMsDuration(time::Duration::from_secs(30))
        );
        assert_eq!(config.bind().unwrap(), "0.0.0.0:8083");
    }

    #[test]
    fn empty_service_name_falls_back_to_default() {
        let config = load(&[("SERVICE_NAME", "")]);

        assert_eq!(config.service_name(), DEFAULT_SERVICE_NAME);
    }

    #[test]
    fn empty_service_port_falls_back_to_default() {
        let config = load(&[("SERVICE_PORT", "")]);

        assert_eq!(config.service_port(), "8083");
        assert_eq!(config.bind().unwrap(), "0.0.0.0:8083");
    }

    #[test]
    fn empty_eureka_server_falls_back_to_default() {
        let config = load(&[("EUREKA_SERVER", "")]);

        assert_eq!(
            config.eureka_server().unwrap().as_str(),
            DEFAULT_EUREKA_SERVER
        );
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("SERVICE_NAME", "svcA"),
            ("SERVICE_PORT", "9090"),
            ("EUREKA_SERVER", "http://localhost:8761/eureka/"),
            ("RENEWAL_INTERVAL", "1000"),
        ]);

        assert_eq!(config.service_name(), "svcA");
        assert_eq!(config.bind().unwrap(), "0.0.0.0:9090");
        assert_eq!(config.eureka_server().unwrap().host_str(), Some("localhost"));
        assert_eq!(config.renewal_interval.0, time::Duration::from_secs(1));
    }

    #[test]
    fn keeps_the_port_as_written() {
        let config = load(&[("SERVICE_PORT", "08083")]);

        assert_eq!(config.service_port(), "08083");
        assert_eq!(config.port().unwrap(), 8083);
    }

    #[test]
    fn rejects_invalid_values() {
        let config = load(&[("SERVICE_PORT", "http"), ("EUREKA_SERVER", "not a url")]);

        assert!(matches!(config.port(), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(
            config.eureka_server(),
            Err(ConfigError::InvalidRegistryUrl { .. })
        ));
    }

    #[test]
    fn test_parse_env_ms_duration() {
        assert_eq!(
            "250".parse::<EnvMsDuration>(),
            Ok(EnvMsDuration(time::Duration::from_millis(250)))
        );
        assert_eq!(
            "-1".parse::<EnvMsDuration>(),
            Err(ParseEnvMsDurationError)
        );
    }
}
