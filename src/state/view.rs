//! Borrowed views that pair an entity with the graph it lives in, so
//! id references can be followed.

use crate::models::variable::UpdateMode;
use crate::state::entity::{Credential, Deployment, Path};
use crate::state::graph::Graph;
use std::fmt;
use std::ops::Deref;

#[derive(Clone, Copy)]
pub struct CredentialRef<'a> {
    graph: &'a Graph,
    credential: &'a Credential,
}

impl<'a> CredentialRef<'a> {
    pub(crate) fn new(graph: &'a Graph, credential: &'a Credential) -> Self {
        Self { graph, credential }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn credential(&self) -> &'a Credential {
        self.credential
    }

    /// The owning path.
    pub fn path(&self) -> Option<PathRef<'a>> {
        self.graph.path(&self.credential.name)
    }

    /// The CA version that issued this certificate.
    pub fn signer(&self) -> Option<CredentialRef<'a>> {
        let graph = self.graph;
        self.credential
            .signed_by
            .as_deref()
            .and_then(|id| graph.credential(id))
    }

    /// Credentials issued by this CA version.
    pub fn signed(&self) -> impl Iterator<Item = CredentialRef<'a>> + 'a {
        let credential: &'a Credential = self.credential;
        self.graph.lookup(&credential.signs)
    }

    /// The flattened trust chain.
    pub fn chain(&self) -> impl Iterator<Item = CredentialRef<'a>> + 'a {
        let credential: &'a Credential = self.credential;
        self.graph.lookup(&credential.cas)
    }

    /// Credentials whose trust chain contains this one.
    pub fn referencing(&self) -> impl Iterator<Item = CredentialRef<'a>> + 'a {
        let credential: &'a Credential = self.credential;
        self.graph.lookup(&credential.referenced_by)
    }

    pub fn deployments(&self) -> impl Iterator<Item = &'a Deployment> + 'a {
        let graph = self.graph;
        self.credential
            .deployments
            .iter()
            .filter_map(move |name| graph.deployment(name))
    }
}

impl Deref for CredentialRef<'_> {
    type Target = Credential;

    fn deref(&self) -> &Credential {
        self.credential
    }
}

impl PartialEq for CredentialRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.credential.id == other.credential.id
    }
}

impl Eq for CredentialRef<'_> {}

impl fmt::Debug for CredentialRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.credential.name, self.credential.id)
    }
}

#[derive(Clone, Copy)]
pub struct PathRef<'a> {
    graph: &'a Graph,
    path: &'a Path,
}

impl<'a> PathRef<'a> {
    pub(crate) fn new(graph: &'a Graph, path: &'a Path) -> Self {
        Self { graph, path }
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Versions oldest first.
    pub fn versions(&self) -> impl Iterator<Item = CredentialRef<'a>> + 'a {
        let path: &'a Path = self.path;
        self.graph.lookup(&path.versions)
    }

    pub fn latest(&self) -> Option<CredentialRef<'a>> {
        let (graph, path): (&'a Graph, &'a Path) = (self.graph, self.path);
        path.versions.last().and_then(|id| graph.credential(id))
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.path.update_mode()
    }
}

impl Deref for PathRef<'_> {
    type Target = Path;

    fn deref(&self) -> &Path {
        self.path
    }
}

impl fmt::Debug for PathRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.name)
    }
}

/// Either kind of entity an operator can point at.
#[derive(Debug, Clone, Copy)]
pub enum Reference<'a> {
    Path(PathRef<'a>),
    Credential(CredentialRef<'a>),
}

impl<'a> Reference<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Reference::Path(p) => p.path().name.as_str(),
            Reference::Credential(c) => c.credential().name.as_str(),
        }
    }
}
