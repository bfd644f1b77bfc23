//! Systems, gateways and the data they report

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::application::Application;
use super::communication::Communication;
use super::metadata::Metadata;
use super::time::Timestamp;

/// A System descriptor.
///
/// Every field except `name` is optional: search endpoints only return the
/// fields that were asked for, and creation only needs `name` + `gateway`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
    /// Deprecated by the API in favour of `life_cycle_state`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_cycle_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_state: Option<String>,
    #[serde(rename = "comStatus", default, skip_serializing_if = "Option::is_none")]
    pub comm_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_state_change_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_comm_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Gateway>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscriptions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applications: Vec<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_usage: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<Communication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_report: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<Value>,
}

impl System {
    /// Minimal descriptor accepted by `POST systems`.
    pub fn new(name: impl Into<String>, gateway: Gateway) -> Self {
        Self { name: name.into(), gateway: Some(gateway), ..Self::default() }
    }
}

/// Network interface of a System.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub gateway_type: Option<String>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Gateway {
    pub fn with_serial_number(serial_number: impl Into<String>) -> Self {
        Self { serial_number: Some(serial_number.into()), ..Self::default() }
    }
}

/// Latest value of one data id, as returned by `systems/{uid}/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsValue {
    #[serde(default)]
    pub value: Value,
    pub timestamp: Timestamp,
}

/// One data point of a fleet export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    #[serde(alias = "timestamp")]
    pub ts: Timestamp,
    #[serde(alias = "value", default)]
    pub v: Value,
}

/// Fleet export: system uid → data id → data points.
pub type DataAggregate = HashMap<String, HashMap<String, Vec<Datapoint>>>;

/// `parameters` part of a systems import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSystemsDefaults {
    pub default_applications: Vec<String>,
    pub default_state: String,
    pub default_type: String,
}

impl ImportSystemsDefaults {
    /// Imported systems land in `READY`, typed and bound to one application.
    pub fn ready(application_uid: impl Into<String>, system_type: impl Into<String>) -> Self {
        Self {
            default_applications: vec![application_uid.into()],
            default_state: "READY".to_string(),
            default_type: system_type.into(),
        }
    }
}
