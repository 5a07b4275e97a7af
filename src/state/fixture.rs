//! Builders for test graphs.

use crate::models::credential::{CertificateMeta, CredentialRecord, CredentialType};
use crate::models::variable::{UpdateMode, Variable, VariableDefinition};
use crate::state::graph::Graph;
use chrono::{DateTime, TimeZone, Utc};

/// Fixed reference instant so repeated calls within a test agree.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn build(records: Vec<CredentialRecord>, variables: Vec<Variable>) -> Graph {
    Graph::build(records, variables).unwrap()
}

fn record(id: &str, name: &str, credential_type: CredentialType, created: DateTime<Utc>) -> CredentialRecord {
    CredentialRecord {
        id: id.to_string(),
        name: name.to_string(),
        credential_type,
        version_created_at: created,
        transitional: false,
        certificate: None,
    }
}

pub fn password(id: &str, name: &str, created: DateTime<Utc>) -> CredentialRecord {
    record(id, name, CredentialType::Password, created)
}

pub fn json(id: &str, name: &str, created: DateTime<Utc>) -> CredentialRecord {
    record(id, name, CredentialType::Json, created)
}

pub fn certificate(id: &str, name: &str, created: DateTime<Utc>, expiry: DateTime<Utc>) -> CredentialRecord {
    let mut r = record(id, name, CredentialType::Certificate, created);
    r.certificate = Some(CertificateMeta {
        expiry_date: Some(expiry),
        ..CertificateMeta::default()
    });
    r
}

pub fn ca(id: &str, name: &str, created: DateTime<Utc>, expiry: DateTime<Utc>) -> CredentialRecord {
    certificate(id, name, created, expiry).with_certificate(|m| m.certificate_authority = true)
}

pub fn var(deployment: &str, name: &str, id: &str) -> Variable {
    Variable {
        id: id.to_string(),
        name: name.to_string(),
        deployment: deployment.to_string(),
        definition: None,
    }
}

pub fn no_overwrite(mut variable: Variable) -> Variable {
    variable.definition = Some(VariableDefinition {
        name: variable.name.trim_start_matches('/').to_string(),
        variable_type: None,
        update_mode: UpdateMode::NoOverwrite,
        options: Default::default(),
    });
    variable
}

/// Chainable tweaks for certificate records.
pub trait RecordExt: Sized {
    fn with_certificate(self, f: impl FnOnce(&mut CertificateMeta)) -> Self;

    fn key_ids(self, subject: &str, authority: Option<&str>) -> Self {
        self.with_certificate(|m| {
            m.subject_key_id = Some(subject.to_string());
            m.authority_key_id = authority.map(str::to_string);
        })
    }

    fn signed_by(self, issuer: &str) -> Self {
        self.with_certificate(|m| m.signed_by = Some(issuer.to_string()))
    }

    fn trusts(self, ski: &str) -> Self {
        self.with_certificate(|m| m.trusted_ca_key_ids.push(ski.to_string()))
    }

    fn signing(self, signing: bool) -> Self {
        self.with_certificate(|m| m.signing = Some(signing))
    }

    fn self_signed(self) -> Self {
        self.with_certificate(|m| m.self_signed = true)
    }

    fn without_expiry(self) -> Self {
        self.with_certificate(|m| m.expiry_date = None)
    }

    fn transitional(self) -> Self;
}

impl RecordExt for CredentialRecord {
    fn with_certificate(mut self, f: impl FnOnce(&mut CertificateMeta)) -> Self {
        f(self.certificate.get_or_insert_with(CertificateMeta::default));
        self
    }

    fn transitional(mut self) -> Self {
        self.transitional = true;
        self
    }
}
