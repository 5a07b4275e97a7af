//! Graph traversals that expand a credential into related credentials.

use crate::state::filters::Filter;
use crate::state::view::CredentialRef;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

type Expand = dyn for<'a> Fn(CredentialRef<'a>) -> Vec<CredentialRef<'a>> + Send + Sync;

#[derive(Clone)]
pub struct Collector(Arc<Expand>);

impl Collector {
    pub fn new<F>(expand: F) -> Self
    where
        F: for<'a> Fn(CredentialRef<'a>) -> Vec<CredentialRef<'a>> + Send + Sync + 'static,
    {
        Collector(Arc::new(expand))
    }

    pub fn apply<'a>(&self, credential: CredentialRef<'a>) -> Vec<CredentialRef<'a>> {
        (self.0)(credential)
    }

    /// Feed everything this collector reaches into `next`.
    pub fn then(self, next: Collector) -> Collector {
        Collector::new(move |c| {
            Credentials::from(self.apply(c))
                .collect(&next)
                .into_vec()
        })
    }

    /// Keep only reached credentials matching `filter`.
    pub fn filter(self, filter: Filter) -> Collector {
        Collector::new(move |c| {
            self.apply(c)
                .into_iter()
                .filter(|r| filter.matches(*r))
                .collect()
        })
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Collector(..)")
    }
}

fn expand_signer<'a>(c: CredentialRef<'a>) -> Vec<CredentialRef<'a>> {
    c.signer().into_iter().collect()
}

fn expand_signed<'a>(c: CredentialRef<'a>) -> Vec<CredentialRef<'a>> {
    c.signed().collect()
}

fn expand_chain<'a>(c: CredentialRef<'a>) -> Vec<CredentialRef<'a>> {
    c.chain().collect()
}

fn expand_referencing<'a>(c: CredentialRef<'a>) -> Vec<CredentialRef<'a>> {
    c.referencing().collect()
}

fn expand_versions<'a>(c: CredentialRef<'a>) -> Vec<CredentialRef<'a>> {
    c.path().map(|p| p.versions().collect()).unwrap_or_default()
}

fn expand_siblings<'a>(c: CredentialRef<'a>) -> Vec<CredentialRef<'a>> {
    expand_versions(c).into_iter().filter(|v| *v != c).collect()
}

fn expand_latest<'a>(c: CredentialRef<'a>) -> Vec<CredentialRef<'a>> {
    c.path().and_then(|p| p.latest()).into_iter().collect()
}

/// The issuing CA version.
pub fn signer() -> Collector {
    Collector::new(expand_signer)
}

/// Credentials issued by a CA version.
pub fn signed() -> Collector {
    Collector::new(expand_signed)
}

/// The flattened trust chain.
pub fn chain() -> Collector {
    Collector::new(expand_chain)
}

/// Credentials trusting this one.
pub fn referencing() -> Collector {
    Collector::new(expand_referencing)
}

/// Every version of the owning path, itself included.
pub fn versions() -> Collector {
    Collector::new(expand_versions)
}

/// Every other version of the owning path.
pub fn siblings() -> Collector {
    Collector::new(expand_siblings)
}

pub fn latest_version() -> Collector {
    Collector::new(expand_latest)
}

/// An ordered set of credentials from one graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials<'a>(Vec<CredentialRef<'a>>);

impl<'a> Credentials<'a> {
    /// Everything `collector` reaches from any member, de-duplicated by id
    /// in first-seen order.
    pub fn collect(&self, collector: &Collector) -> Credentials<'a> {
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut out = Vec::new();
        for c in &self.0 {
            for reached in collector.apply(*c) {
                if seen.insert(reached.credential().id.as_str()) {
                    out.push(reached);
                }
            }
        }
        Credentials(out)
    }

    pub fn filter(&self, filter: &Filter) -> Credentials<'a> {
        self.0.iter().copied().filter(|c| filter.matches(*c)).collect()
    }

    pub fn includes(&self, id: &str) -> bool {
        self.0.iter().any(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = CredentialRef<'a>> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<CredentialRef<'a>> {
        self.0
    }
}

impl<'a> From<Vec<CredentialRef<'a>>> for Credentials<'a> {
    fn from(credentials: Vec<CredentialRef<'a>>) -> Self {
        Credentials(credentials)
    }
}

impl<'a> FromIterator<CredentialRef<'a>> for Credentials<'a> {
    fn from_iter<I: IntoIterator<Item = CredentialRef<'a>>>(iter: I) -> Self {
        Credentials(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for Credentials<'a> {
    type Item = CredentialRef<'a>;
    type IntoIter = std::vec::IntoIter<CredentialRef<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::filters;
    use crate::state::fixture::*;
    use chrono::Duration;

    fn names(set: &Credentials<'_>) -> Vec<String> {
        set.iter().map(|c| c.id.clone()).collect()
    }

    fn rotated_ca() -> crate::state::graph::Graph {
        let now = now();
        build(
            vec![
                ca("ca1", "/ca", now - Duration::days(300), now + Duration::days(10))
                    .key_ids("k1", None)
                    .transitional(),
                ca("ca2", "/ca", now - Duration::days(1), now + Duration::days(700)).key_ids("k2", None),
                certificate("a", "/a", now - Duration::days(200), now).signed_by("/ca").key_ids("a", Some("k1")),
                certificate("b", "/b", now, now + Duration::days(300)).signed_by("/ca").key_ids("b", Some("k2")),
            ],
            vec![var("cf", "/b", "b")],
        )
    }

    #[test]
    fn test_versions_and_siblings() {
        let graph = rotated_ca();
        let start = Credentials::from(vec![graph.credential("ca1").unwrap()]);
        assert_eq!(names(&start.collect(&versions())), vec!["ca1", "ca2"]);
        assert_eq!(names(&start.collect(&siblings())), vec!["ca2"]);
        assert_eq!(names(&start.collect(&latest_version())), vec!["ca2"]);
    }

    #[test]
    fn test_then_chains_and_dedups() {
        let graph = rotated_ca();
        let leaves = Credentials::from(vec![graph.credential("a").unwrap(), graph.credential("b").unwrap()]);
        // both leaves reach the same path through different signers
        let reached = leaves.collect(&signer().then(versions()));
        assert_eq!(names(&reached), vec!["ca1", "ca2"]);
    }

    #[test]
    fn test_filtered_collector() {
        let graph = rotated_ca();
        let ca2 = Credentials::from(vec![graph.credential("ca2").unwrap()]);
        assert_eq!(names(&ca2.collect(&signed())), vec!["b"]);
        assert_eq!(names(&ca2.collect(&signed().filter(filters::deployed()))), vec!["b"]);
        let ca1 = Credentials::from(vec![graph.credential("ca1").unwrap()]);
        assert!(ca1.collect(&signed().filter(filters::deployed())).is_empty());
        assert_eq!(names(&ca1.collect(&referencing())), vec!["a"]);
    }

    #[test]
    fn test_set_helpers() {
        let graph = rotated_ca();
        let all = graph.credentials(&[]);
        assert_eq!(all.len(), 4);
        assert!(all.includes("b"));
        assert!(!all.includes("zz"));
        assert_eq!(names(&all.filter(&filters::latest())), vec!["a", "b", "ca2"]);
    }
}
