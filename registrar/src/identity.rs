use std::ffi::OsString;
use std::io;

use crate::config::Config;
use crate::error::IdentityError;

/// The identity this process registers and renews under.
///
/// Built once at startup and shared read-only between the registration and
/// renewal tasks, so both always address the same registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    host_name: String,
    service_name: String,
    service_port: String,
    instance_id: String,
}

impl InstanceIdentity {
    pub fn new(host_name: &str, service_name: &str, service_port: &str) -> Self {
        Self {
            host_name: host_name.to_owned(),
            service_name: service_name.to_owned(),
            service_port: service_port.to_owned(),
            instance_id: format!("{}:{}:{}", host_name, service_name, service_port),
        }
    }

    /// Resolve the identity from configuration and the local host name.
    pub fn resolve(config: &Config) -> Result<Self, IdentityError> {
        Self::resolve_with(config, hostname::get)
    }

    /// Resolve the identity, reading the host name from `host_name`.
    pub fn resolve_with<H>(config: &Config, host_name: H) -> Result<Self, IdentityError>
    where
        H: FnOnce() -> io::Result<OsString>,
    {
        let host_name = host_name()?
            .into_string()
            .map_err(IdentityError::HostNameEncodingError)?;

        Ok(Self::new(
            &host_name,
            config.service_name(),
            config.service_port(),
        ))
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn service_port(&self) -> &str {
        &self.service_port
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
}
