//! Deployments, paths and credential versions.
//!
//! All cross references are ids resolved through the owning [`Graph`],
//! never owning pointers.
//!
//! [`Graph`]: crate::state::graph::Graph

use crate::models::credential::{CredentialRecord, CredentialType};
use crate::models::variable::{UpdateMode, VariableDefinition};
use crate::state::index::Indexed;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Credential version id as issued by the credential store.
pub type CredentialId = String;

/// Whether a CA version is the one its path currently signs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Signing {
    #[default]
    Unknown,
    Signer,
    NonSigner,
}

impl Signing {
    pub fn is_signer(&self) -> bool {
        matches!(self, Signing::Signer)
    }
}

impl From<Option<bool>> for Signing {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            None => Signing::Unknown,
            Some(true) => Signing::Signer,
            Some(false) => Signing::NonSigner,
        }
    }
}

impl fmt::Display for Signing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signing::Unknown => f.write_str("unknown"),
            Signing::Signer => f.write_str("signer"),
            Signing::NonSigner => f.write_str("non-signer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub name: String,
    /// Paths referenced by the manifest.
    pub paths: BTreeSet<String>,
    /// Versions the deployment currently runs with.
    pub credentials: BTreeSet<CredentialId>,
}

impl Deployment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: BTreeSet::new(),
            credentials: BTreeSet::new(),
        }
    }
}

impl Indexed for Deployment {
    type Key = String;
    type Order = String;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn order(&self) -> String {
        self.name.clone()
    }
}

/// A logical secret slot and its version history.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub name: String,
    pub variable_definition: Option<VariableDefinition>,
    pub deployments: BTreeSet<String>,
    /// Oldest first; the last entry is the latest version.
    pub versions: Vec<CredentialId>,
}

impl Path {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variable_definition: None,
            deployments: BTreeSet::new(),
            versions: Vec::new(),
        }
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.variable_definition
            .as_ref()
            .map(|d| d.update_mode)
            .unwrap_or_default()
    }
}

impl Indexed for Path {
    type Key = String;
    type Order = String;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn order(&self) -> String {
        self.name.clone()
    }
}

/// One version of a secret.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub id: CredentialId,
    pub name: String,
    pub credential_type: CredentialType,
    pub version_created_at: DateTime<Utc>,
    pub latest: bool,
    pub transitional: bool,
    pub deployments: BTreeSet<String>,

    // Certificate only.
    pub expiry_date: Option<DateTime<Utc>>,
    pub certificate_authority: bool,
    pub self_signed: bool,
    pub signing: Signing,
    pub signed_by: Option<CredentialId>,
    pub signs: Vec<CredentialId>,
    /// Flattened trust chain.
    pub cas: Vec<CredentialId>,
    /// Credentials whose trust chain contains this one.
    pub referenced_by: Vec<CredentialId>,

    // Issuer identity, consumed while linking.
    pub(crate) issuer: Option<String>,
    pub(crate) subject_key_id: Option<String>,
    pub(crate) authority_key_id: Option<String>,
    pub(crate) trusted_ca_key_ids: Vec<String>,
}

impl Credential {
    pub fn from_record(record: CredentialRecord) -> Self {
        let cert = record.certificate.unwrap_or_default();
        Self {
            id: record.id,
            name: record.name,
            credential_type: record.credential_type,
            version_created_at: record.version_created_at,
            latest: false,
            transitional: record.transitional,
            deployments: BTreeSet::new(),
            expiry_date: cert.expiry_date,
            certificate_authority: cert.certificate_authority,
            self_signed: cert.self_signed,
            signing: Signing::from(cert.signing),
            signed_by: None,
            signs: Vec::new(),
            cas: Vec::new(),
            referenced_by: Vec::new(),
            issuer: cert.signed_by,
            subject_key_id: cert.subject_key_id,
            authority_key_id: cert.authority_key_id,
            trusted_ca_key_ids: cert.trusted_ca_key_ids,
        }
    }

    /// Latest and not transitional: the version consumers should use.
    pub fn active(&self) -> bool {
        self.latest && !self.transitional
    }

    pub fn is_deployed(&self) -> bool {
        !self.deployments.is_empty()
    }

    pub fn is_certificate(&self) -> bool {
        self.credential_type == CredentialType::Certificate
    }
}

impl Indexed for Credential {
    type Key = CredentialId;
    type Order = (String, DateTime<Utc>, CredentialId);

    fn key(&self) -> CredentialId {
        self.id.clone()
    }

    fn order(&self) -> Self::Order {
        (self.name.clone(), self.version_created_at, self.id.clone())
    }
}
