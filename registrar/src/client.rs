use std::time;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use url::Url;

use crate::document::RegistrationDocument;
use crate::error::RegistryError;
use crate::identity::InstanceIdentity;

/// A single round-trip to the discovery registry.
///
/// Implementations return `Ok` for any HTTP response, whatever its status,
/// and `Err` only when no response was received.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Submit the registration document for `identity`.
    async fn register(&self, identity: &InstanceIdentity) -> Result<StatusCode, RegistryError>;

    /// Send a heartbeat for the registration of `identity`.
    async fn renew(&self, identity: &InstanceIdentity) -> Result<StatusCode, RegistryError>;
}

/// `RegistryClient` speaking the Eureka REST API.
pub struct EurekaClient {
    /// Base URL of the registry, e.g. `http://discovery-server:8761/eureka/`.
    base: Url,
    /// The client used for HTTP requests.
    client: reqwest::Client,
}

impl EurekaClient {
    pub fn new(base: Url, request_timeout: time::Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("registrar/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()?;

        Ok(Self { base, client })
    }

    /// `<base>/apps/<service name>`
    pub fn app_url(&self, identity: &InstanceIdentity) -> Result<Url, RegistryError> {
        self.url_for(&["apps", identity.service_name()])
    }

    /// `<base>/apps/<service name>/<instance id>`
    pub fn instance_url(&self, identity: &InstanceIdentity) -> Result<Url, RegistryError> {
        self.url_for(&["apps", identity.service_name(), identity.instance_id()])
    }

    fn url_for(&self, segments: &[&str]) -> Result<Url, RegistryError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RegistryError::InvalidEndpoint(self.base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl RegistryClient for EurekaClient {
    async fn register(&self, identity: &InstanceIdentity) -> Result<StatusCode, RegistryError> {
        let url = self.app_url(identity)?;
        let body = RegistrationDocument::new(identity).to_xml()?;

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/xml")
            .body(body)
            .send()
            .await?;

        Ok(response.status())
    }

    async fn renew(&self, identity: &InstanceIdentity) -> Result<StatusCode, RegistryError> {
        let url = self.instance_url(identity)?;

        let response = self.client.put(url).send().await?;

        Ok(response.status())
    }
}
