//! Communication settings and device security information

use serde::{Deserialize, Serialize};

/// Credentials for one communication protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_password: Option<String>,
}

/// Per-protocol communication settings of a system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Communication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msci: Option<ComProto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m3da: Option<ComProto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<ComProto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mqtt: Option<ComProto>,
}

/// Security information of a device, as returned by
/// `device/internal/securityinfo`.
///
/// That endpoint emits Java-object JSON; the class tags must be stripped
/// before this type can be decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSecurityInfo {
    #[serde(default)]
    pub system_exist: bool,
    #[serde(default)]
    pub allowed_to_comm: bool,
    #[serde(rename = "commInfo", default)]
    pub comm_infos: Vec<SystemCommInfo>,
}

/// Communication identifiers and secrets of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemCommInfo {
    pub system_id: Option<String>,
    pub company_id: Option<String>,
    pub serial_number: Option<String>,
    pub imei: Option<String>,
    pub heartbeat_seconds: Option<u64>,

    pub msci_comm_id: Option<String>,
    pub msci_password: Option<String>,

    pub omadm_comm_id: Option<String>,
    pub omadm_security_type: Option<String>,
    pub omadm_client_username: Option<String>,
    pub omadm_client_password: Option<String>,
    pub omadm_client_nonce: Option<String>,
    pub omadm_server_password: Option<String>,
    pub omadm_server_nonce: Option<String>,

    pub awtda2_comm_id: Option<String>,

    pub m3da_comm_id: Option<String>,
    pub m3da_security_type: Option<String>,
    pub m3da_nonce: Option<String>,
    pub m3da_cipher: Option<String>,
    pub m3da_shared_key: Option<String>,
    pub m3da_credential: Option<String>,

    pub mqtt_comm_id: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_security_type: Option<String>,
    pub mqtt_broker: Option<bool>,
    #[serde(rename = "mqttCA")]
    pub mqtt_ca: Option<String>,

    pub rest_comm_id: Option<String>,
    pub rest_password: Option<String>,

    pub lwm2m_comm_id: Option<String>,
    pub lwm2m_security_type: Option<String>,
    pub lwm2m_psk_identity: Option<String>,
    pub lwm2m_psk_secret_hex: Option<String>,
    pub lwm2m_observe_supported: Option<bool>,
}
