//! Arena holding one synchronized snapshot of deployments, paths and
//! credentials, plus the relinking pass that wires certificates together.

use crate::models::credential::CredentialRecord;
use crate::models::variable::Variable;
use crate::state::collectors::Credentials;
use crate::state::entity::{Credential, CredentialId, Deployment, Path};
use crate::state::error::StateError;
use crate::state::filters::Filter;
use crate::state::index::OrderedIndex;
use crate::state::view::{CredentialRef, PathRef, Reference};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    deployments: OrderedIndex<Deployment>,
    paths: OrderedIndex<Path>,
    credentials: OrderedIndex<Credential>,
}

impl Graph {
    /// Build a graph from both collaborator feeds.
    ///
    /// Identity problems reject the whole input. Dangling references
    /// (unknown versions, unknown issuers) only leave that link unset.
    pub fn build(records: Vec<CredentialRecord>, variables: Vec<Variable>) -> Result<Self, StateError> {
        validate(&records, &variables)?;

        let mut graph = Graph::default();
        for record in records {
            let credential = Credential::from_record(record);
            if !graph.paths.contains_key(credential.name.as_str()) {
                graph.paths.insert(Path::new(credential.name.clone()));
            }
            let id = credential.id.clone();
            graph
                .paths
                .modify(credential.name.as_str(), |p| p.versions.push(id));
            graph.credentials.insert(credential);
        }

        graph.order_versions();
        graph.attach_variables(variables);
        graph.link_certificates();
        Ok(graph)
    }

    pub fn credential(&self, id: &str) -> Option<CredentialRef<'_>> {
        self.credentials
            .get(id)
            .map(|c| CredentialRef::new(self, c))
    }

    pub fn path(&self, name: &str) -> Option<PathRef<'_>> {
        self.paths.get(name).map(|p| PathRef::new(self, p))
    }

    pub fn deployment(&self, name: &str) -> Option<&Deployment> {
        self.deployments.get(name)
    }

    pub fn deployments(&self) -> impl Iterator<Item = &Deployment> + '_ {
        self.deployments.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = PathRef<'_>> + '_ {
        self.paths.iter().map(move |p| PathRef::new(self, p))
    }

    /// Every credential matching all `filters`, in (name, creation) order.
    pub fn credentials(&self, filters: &[Filter]) -> Credentials<'_> {
        self.credentials
            .iter()
            .map(|c| CredentialRef::new(self, c))
            .filter(|c| filters.iter().all(|f| f.matches(*c)))
            .collect()
    }

    /// Resolve an operator-supplied reference: a version id or a path name.
    pub fn resolve(&self, reference: &str) -> Option<Reference<'_>> {
        if let Some(cred) = self.credential(reference) {
            return Some(Reference::Credential(cred));
        }
        self.path(reference).map(Reference::Path)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.deployments.len(), self.paths.len(), self.credentials.len())
    }

    pub(crate) fn lookup<'a>(
        &'a self,
        ids: &'a [CredentialId],
    ) -> impl Iterator<Item = CredentialRef<'a>> + 'a {
        ids.iter().filter_map(move |id| self.credential(id))
    }

    /// Sort each path's versions oldest first and flag the newest as latest.
    fn order_versions(&mut self) {
        let names: Vec<String> = self.paths.keys().cloned().collect();
        for name in names {
            let mut versions = self
                .paths
                .get(name.as_str())
                .map(|p| p.versions.clone())
                .unwrap_or_default();
            versions.sort_by_key(|id| {
                self.credentials
                    .get(id.as_str())
                    .map(|c| (c.version_created_at, c.id.clone()))
            });
            let latest = versions.last().cloned();
            for id in &versions {
                let is_latest = latest.as_ref() == Some(id);
                self.credentials.modify(id.as_str(), |c| c.latest = is_latest);
            }
            self.paths.modify(name.as_str(), |p| p.versions = versions);
        }
    }

    fn attach_variables(&mut self, variables: Vec<Variable>) {
        for var in variables {
            if !self.deployments.contains_key(var.deployment.as_str()) {
                self.deployments.insert(Deployment::new(var.deployment.clone()));
            }
            if !self.paths.contains_key(var.name.as_str()) {
                debug!(path = %var.name, deployment = %var.deployment, "variable names a path with no versions");
                self.paths.insert(Path::new(var.name.clone()));
            }

            let linked = !var.id.is_empty()
                && self
                    .credentials
                    .get(var.id.as_str())
                    .is_some_and(|c| c.name == var.name);
            if linked {
                let deployment = var.deployment.clone();
                self.credentials.modify(var.id.as_str(), |c| {
                    c.deployments.insert(deployment);
                });
            } else if !var.id.is_empty() {
                debug!(path = %var.name, id = %var.id, deployment = %var.deployment, "variable references unknown version");
            }

            let deployment = var.deployment.clone();
            let definition = var.definition;
            self.paths.modify(var.name.as_str(), |p| {
                p.deployments.insert(deployment);
                if p.variable_definition.is_none() {
                    p.variable_definition = definition;
                }
            });

            let (path, id) = (var.name, var.id);
            self.deployments.modify(var.deployment.as_str(), |d| {
                d.paths.insert(path);
                if linked {
                    d.credentials.insert(id);
                }
            });
        }
    }

    fn link_certificates(&mut self) {
        let signers: Vec<(CredentialId, CredentialId)> = self
            .credentials
            .iter()
            .filter_map(|c| self.resolve_signer(c).map(|s| (c.id.clone(), s)))
            .collect();
        for (id, signer) in &signers {
            self.credentials
                .modify(id.as_str(), |c| c.signed_by = Some(signer.clone()));
            self.credentials
                .modify(signer.as_str(), |c| c.signs.push(id.clone()));
        }

        let mut authorities: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for ca in self.credentials.iter().filter(|c| c.certificate_authority) {
            if let Some(ski) = ca.subject_key_id.as_deref() {
                authorities.entry(ski).or_default().push(ca.id.as_str());
            }
        }
        let chains: Vec<(CredentialId, Vec<CredentialId>)> = self
            .credentials
            .iter()
            .map(|c| (c.id.clone(), self.trust_chain(c, &authorities)))
            .filter(|(_, chain)| !chain.is_empty())
            .collect();
        for (id, chain) in chains {
            for ca in &chain {
                self.credentials
                    .modify(ca.as_str(), |c| c.referenced_by.push(id.clone()));
            }
            self.credentials.modify(id.as_str(), |c| c.cas = chain);
        }
    }

    /// The issuing version: matched by key id, else the newest issuer
    /// version that already existed when this one was created.
    fn resolve_signer(&self, cred: &Credential) -> Option<CredentialId> {
        let issuer = cred.issuer.as_deref()?;
        if cred.self_signed || issuer == cred.name {
            return None;
        }
        let Some(path) = self.paths.get(issuer) else {
            debug!(id = %cred.id, issuer, "issuer path unknown");
            return None;
        };

        let versions = || path.versions.iter().filter_map(|id| self.credentials.get(id.as_str()));
        if let Some(aki) = cred.authority_key_id.as_deref() {
            if let Some(ca) = versions().find(|ca| ca.subject_key_id.as_deref() == Some(aki)) {
                return Some(ca.id.clone());
            }
        }
        let found = versions()
            .filter(|ca| ca.version_created_at <= cred.version_created_at)
            .last()
            .map(|ca| ca.id.clone());
        if found.is_none() {
            debug!(id = %cred.id, issuer, "no issuer version predates certificate");
        }
        found
    }

    fn trust_chain(&self, cred: &Credential, authorities: &BTreeMap<&str, Vec<&str>>) -> Vec<CredentialId> {
        let mut chain = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(cred.id.as_str());

        let mut next = cred.signed_by.as_deref();
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            chain.push(id.to_string());
            next = self
                .credentials
                .get(id)
                .and_then(|c| c.signed_by.as_deref());
        }

        for ski in &cred.trusted_ca_key_ids {
            for id in authorities.get(ski.as_str()).into_iter().flatten().copied() {
                if seen.insert(id) {
                    chain.push(id.to_string());
                }
            }
        }
        chain
    }
}

fn validate(records: &[CredentialRecord], variables: &[Variable]) -> Result<(), StateError> {
    let mut ids = HashSet::new();
    for record in records {
        if record.id.trim().is_empty() {
            return Err(StateError::MissingIdentity { kind: "credential", field: "id" });
        }
        if record.name.trim().is_empty() {
            return Err(StateError::MissingIdentity { kind: "credential", field: "name" });
        }
        if !record.name.starts_with('/') {
            return Err(StateError::InvalidName(record.name.clone()));
        }
        if !ids.insert(record.id.as_str()) {
            return Err(StateError::DuplicateCredential(record.id.clone()));
        }
    }
    for var in variables {
        if var.deployment.trim().is_empty() {
            return Err(StateError::MissingIdentity { kind: "variable", field: "deployment" });
        }
        if var.name.trim().is_empty() {
            return Err(StateError::MissingIdentity { kind: "variable", field: "name" });
        }
        if !var.name.starts_with('/') {
            return Err(StateError::InvalidName(var.name.clone()));
        }
    }
    Ok(())
}
