use thiserror::Error;

/// Errors raised by a single call to the discovery registry.
///
/// Only transport-level failures are errors: an HTTP response with any status
/// code is a completed call as far as the registration lifecycle goes.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("{0} cannot be used as a registry base url")]
    InvalidEndpoint(url::Url),
    #[error("failed to serialize registration document: {0}")]
    SerializeError(#[from] quick_xml::DeError),
}

/// Errors raised when a configured value cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("SERVICE_PORT {0:?} is not a valid port")]
    InvalidPort(String),
    #[error("EUREKA_SERVER {value:?} is not a valid url: {source}")]
    InvalidRegistryUrl {
        value: String,
        source: url::ParseError,
    },
}

/// Errors raised while resolving the identity this instance registers under.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("failed to read local host name: {0}")]
    HostNameError(#[from] std::io::Error),
    #[error("local host name is not valid utf-8: {0:?}")]
    HostNameEncodingError(std::ffi::OsString),
}

/// Errors that stop the service from starting or serving.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("invalid configuration: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("cannot register without an instance identity")]
    IdentityError(#[from] IdentityError),
    #[error("failed to build registry client: {0}")]
    ClientError(#[from] reqwest::Error),
    #[error("http server failed: {0}")]
    IoError(#[from] std::io::Error),
}
