//! Credential-store inventory records.

use crate::state::error::StateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of secret held by a credential-store path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    Value,
    Json,
    Password,
    User,
    Certificate,
    Rsa,
    Ssh,
}

impl CredentialType {
    pub const ALL: &'static [CredentialType] = &[
        CredentialType::Value,
        CredentialType::Json,
        CredentialType::Password,
        CredentialType::User,
        CredentialType::Certificate,
        CredentialType::Rsa,
        CredentialType::Ssh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialType::Value => "value",
            CredentialType::Json => "json",
            CredentialType::Password => "password",
            CredentialType::User => "user",
            CredentialType::Certificate => "certificate",
            CredentialType::Rsa => "rsa",
            CredentialType::Ssh => "ssh",
        }
    }

    /// Whether the credential store can generate a fresh value of this type.
    /// Opaque blobs (`value`, `json`) are supplied by operators.
    pub fn regenerable(&self) -> bool {
        !matches!(self, CredentialType::Value | CredentialType::Json)
    }

    /// Whether individual versions of this type can be deleted.
    pub fn supports_version_deletion(&self) -> bool {
        matches!(self, CredentialType::Certificate)
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialType {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CredentialType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| StateError::UnknownCredentialType(s.to_string()))
    }
}

/// One credential version as reported by the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub credential_type: CredentialType,
    pub version_created_at: DateTime<Utc>,
    #[serde(default)]
    pub transitional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateMeta>,
}

/// Certificate metadata attached to certificate versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateMeta {
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub certificate_authority: bool,
    #[serde(default)]
    pub self_signed: bool,
    /// Whether this version is the one its CA path currently signs with.
    #[serde(default)]
    pub signing: Option<bool>,
    /// Name of the issuing CA path.
    #[serde(default)]
    pub signed_by: Option<String>,
    #[serde(default)]
    pub subject_key_id: Option<String>,
    #[serde(default)]
    pub authority_key_id: Option<String>,
    /// Subject key ids of the CA certificates bundled with this one.
    #[serde(default)]
    pub trusted_ca_key_ids: Vec<String>,
}
