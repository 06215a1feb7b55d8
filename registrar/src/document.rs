//! The self-description submitted to the registry when registering.
use serde::Serialize;

use crate::error::RegistryError;
use crate::identity::InstanceIdentity;

const STATUS_UP: &str = "UP";
const DATA_CENTER_CLASS: &str = "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";
const DATA_CENTER_NAME: &str = "MyOwn";

/// Eureka `<instance>` document. Field order is the order the registry expects.
#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename = "instance", rename_all = "camelCase")]
pub struct RegistrationDocument<'a> {
    host_name: &'a str,
    app: &'a str,
    ip_addr: &'a str,
    vip_address: &'a str,
    status: &'static str,
    port: Port<'a>,
    instance_id: &'a str,
    data_center_info: DataCenterInfo,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct Port<'a> {
    // Eureka wants the literal string, not a boolean.
    #[serde(rename = "@enabled")]
    enabled: &'static str,
    #[serde(rename = "$text")]
    value: &'a str,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct DataCenterInfo {
    #[serde(rename = "@class")]
    class: &'static str,
    name: &'static str,
}

impl<'a> RegistrationDocument<'a> {
    pub fn new(identity: &'a InstanceIdentity) -> Self {
        Self {
            host_name: identity.host_name(),
            app: identity.service_name(),
            ip_addr: identity.host_name(),
            vip_address: identity.service_name(),
            status: STATUS_UP,
            port: Port {
                enabled: "true",
                value: identity.service_port(),
            },
            instance_id: identity.instance_id(),
            data_center_info: DataCenterInfo {
                class: DATA_CENTER_CLASS,
                name: DATA_CENTER_NAME,
            },
        }
    }

    pub fn to_xml(&self) -> Result<String, RegistryError> {
        Ok(quick_xml::se::to_string(self)?)
    }
}
