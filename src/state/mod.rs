//! In-memory rotation state: the credential graph, its query algebra and
//! the decision engine.
//!
//! A [`Store`] holds the current [`Graph`] snapshot. Refreshing builds a
//! complete replacement off-lock and swaps it in, so readers never see a
//! partially linked graph.

pub mod action;
pub mod collectors;
pub mod entity;
pub mod error;
pub mod filters;
pub mod graph;
pub mod index;
pub mod view;

#[cfg(test)]
pub(crate) mod fixture;

pub use action::{Rules, Verdict};
pub use collectors::{Collector, Credentials};
pub use entity::{Credential, CredentialId, Deployment, Path, Signing};
pub use error::StateError;
pub use filters::{Filter, FilterConfig};
pub use graph::Graph;
pub use view::{CredentialRef, PathRef, Reference};

use crate::models::credential::CredentialRecord;
use crate::models::variable::Variable;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Holder of the current graph snapshot.
#[derive(Debug, Default)]
pub struct Store {
    current: RwLock<Arc<Graph>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the graph with one built from both feeds.
    ///
    /// On error the previous snapshot stays in place.
    pub fn update(&self, records: Vec<CredentialRecord>, variables: Vec<Variable>) -> Result<(), StateError> {
        let graph = match Graph::build(records, variables) {
            Ok(graph) => graph,
            Err(e) => {
                warn!(error = %e, "refresh rejected, keeping previous state");
                return Err(e);
            }
        };

        let (deployments, paths, credentials) = graph.counts();
        *self.current.write() = Arc::new(graph);
        info!(deployments, paths, credentials, "state refreshed");
        Ok(())
    }

    /// The current snapshot. It stays valid across later updates.
    pub fn snapshot(&self) -> Arc<Graph> {
        Arc::clone(&self.current.read())
    }

    /// Every credential matching all `filters`; no filters selects all.
    pub fn credentials(&self, filters: &[Filter]) -> Selection {
        let graph = self.snapshot();
        let ids = graph
            .credentials(filters)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        Selection { graph, ids }
    }
}

/// A filtered set of credentials that keeps its snapshot alive.
#[derive(Debug, Clone)]
pub struct Selection {
    graph: Arc<Graph>,
    ids: Vec<CredentialId>,
}

impl Selection {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn iter(&self) -> impl Iterator<Item = CredentialRef<'_>> + '_ {
        self.graph.lookup(&self.ids)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::Action;
    use crate::models::criteria::RegenerationCriteria;
    use crate::state::fixture::*;
    use chrono::Duration;

    #[test]
    fn test_empty_store() {
        let store = Store::new();
        assert!(store.credentials(&[]).is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_update_replaces_graph() {
        let now = now();
        let store = Store::new();
        store
            .update(vec![password("p1", "/a", now)], vec![var("d", "/a", "p1")])
            .unwrap();
        assert_eq!(store.credentials(&[]).len(), 1);

        store
            .update(vec![password("p2", "/b", now), password("p3", "/b", now)], vec![])
            .unwrap();
        let ids: Vec<String> = store.credentials(&[]).iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["p2", "p3"]);
        assert!(store.snapshot().deployment("d").is_none());
    }

    #[test]
    fn test_failed_update_keeps_previous_graph() {
        let now = now();
        let store = Store::new();
        store.update(vec![password("p1", "/a", now)], vec![]).unwrap();

        let err = store
            .update(vec![password("p2", "/b", now), password("p2", "/c", now)], vec![])
            .unwrap_err();
        assert_eq!(err, StateError::DuplicateCredential("p2".to_string()));

        let ids: Vec<String> = store.credentials(&[]).iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["p1"]);
    }

    #[test]
    fn test_selection_outlives_update() {
        let now = now();
        let store = Store::new();
        store.update(vec![password("p1", "/a", now)], vec![]).unwrap();
        let selection = store.credentials(&[filters::latest()]);

        store.update(vec![], vec![]).unwrap();
        assert!(store.credentials(&[]).is_empty());
        assert_eq!(selection.iter().next().unwrap().id, "p1");
    }

    #[test]
    fn test_selection_applies_filters() {
        let now = now();
        let store = Store::new();
        store
            .update(
                vec![
                    password("old", "/p", now - Duration::days(30)),
                    password("new", "/p", now - Duration::days(2)),
                ],
                vec![var("a", "/p", "new")],
            )
            .unwrap();
        let selection = store.credentials(&[filters::latest()]);
        assert_eq!(selection.len(), 1);

        let criteria = RegenerationCriteria::default().older_than(now - Duration::days(1));
        let actions: Vec<Action> = selection.iter().map(|c| c.next_action(&criteria)).collect();
        assert_eq!(actions, vec![Action::Regenerate]);
    }
}
