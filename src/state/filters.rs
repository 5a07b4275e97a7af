//! Composable credential predicates.
//!
//! A [`Filter`] is a pure `CredentialRef -> bool`. Leaf constructors cover
//! single attributes; [`not`], [`and`], [`or`] and [`any`] compose them,
//! the latter reaching through the graph via a [`Collector`].

use crate::models::credential::CredentialType;
use crate::state::collectors::{Collector, Credentials};
use crate::state::error::StateError;
use crate::state::view::CredentialRef;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(CredentialRef<'_>) -> bool + Send + Sync;

#[derive(Clone)]
pub struct Filter(Arc<Predicate>);

impl Filter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(CredentialRef<'_>) -> bool + Send + Sync + 'static,
    {
        Filter(Arc::new(predicate))
    }

    pub fn matches(&self, credential: CredentialRef<'_>) -> bool {
        (self.0)(credential)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

pub fn not(filter: Filter) -> Filter {
    Filter::new(move |c| !filter.matches(c))
}

/// True when every filter matches; vacuously true for none.
pub fn and(filters: impl IntoIterator<Item = Filter>) -> Filter {
    let filters: Vec<Filter> = filters.into_iter().collect();
    Filter::new(move |c| filters.iter().all(|f| f.matches(c)))
}

/// True when some filter matches; false for none.
pub fn or(filters: impl IntoIterator<Item = Filter>) -> Filter {
    let filters: Vec<Filter> = filters.into_iter().collect();
    Filter::new(move |c| filters.iter().any(|f| f.matches(c)))
}

/// True when `collector` reaches at least one credential from `c`.
pub fn any(collector: Collector) -> Filter {
    Filter::new(move |c| !Credentials::from(vec![c]).collect(&collector).is_empty())
}

/// No issuing CA is known.
pub fn self_signed() -> Filter {
    Filter::new(|c| c.signed_by.is_none())
}

pub fn active() -> Filter {
    Filter::new(|c| c.active())
}

pub fn latest() -> Filter {
    Filter::new(|c| c.latest)
}

pub fn signing() -> Filter {
    Filter::new(|c| c.signing.is_signer())
}

pub fn transitional() -> Filter {
    Filter::new(|c| c.transitional)
}

pub fn deployed() -> Filter {
    Filter::new(|c| c.is_deployed())
}

pub fn types(types: &[CredentialType]) -> Filter {
    let types = types.to_vec();
    Filter::new(move |c| types.contains(&c.credential_type))
}

/// Type filter from operator input; unknown names are rejected.
pub fn types_from_names<S: AsRef<str>>(names: &[S]) -> Result<Filter, StateError> {
    let parsed = names
        .iter()
        .map(|n| n.as_ref().parse::<CredentialType>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(types(&parsed))
}

/// The credential's path is referenced by `deployment`.
pub fn deployed_to(deployment: impl Into<String>) -> Filter {
    let deployment = deployment.into();
    Filter::new(move |c| c.path().is_some_and(|p| p.deployments.contains(&deployment)))
}

pub fn deployed_to_any<S: AsRef<str>>(deployments: &[S]) -> Filter {
    or(deployments.iter().map(|d| deployed_to(d.as_ref())))
}

pub fn name(name: impl Into<String>) -> Filter {
    let name = name.into();
    Filter::new(move |c| c.name == name)
}

pub fn certificate_authority(expected: bool) -> Filter {
    Filter::new(move |c| c.certificate_authority == expected)
}

/// Has an expiry date strictly before `at`. No expiry never matches.
pub fn expires_before(at: DateTime<Utc>) -> Filter {
    Filter::new(move |c| c.expiry_date.is_some_and(|e| e < at))
}

pub fn older_than(at: DateTime<Utc>) -> Filter {
    Filter::new(move |c| c.version_created_at < at)
}

/// Issued by a version of the CA path `name`.
pub fn signed_by(name: impl Into<String>) -> Filter {
    let name = name.into();
    Filter::new(move |c| c.signer().is_some_and(|s| s.name == name))
}

/// Has the version `id` in its trust chain.
pub fn references(id: impl Into<String>) -> Filter {
    let id = id.into();
    Filter::new(move |c| c.cas.contains(&id))
}

/// Query filters chosen by an operator, fixed once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub types: Vec<CredentialType>,
    pub deployments: Vec<String>,
    pub expires_before: Option<DateTime<Utc>>,
}

impl FilterConfig {
    /// Parse operator-supplied type names; unknown names are rejected.
    pub fn new<S: AsRef<str>>(
        types: &[S],
        deployments: Vec<String>,
        expires_before: Option<DateTime<Utc>>,
    ) -> Result<Self, StateError> {
        let types = types
            .iter()
            .map(|n| n.as_ref().parse::<CredentialType>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            types,
            deployments,
            expires_before,
        })
    }

    /// Empty lists do not restrict the selection.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if !self.types.is_empty() {
            filters.push(types(&self.types));
        }
        if !self.deployments.is_empty() {
            filters.push(deployed_to_any(&self.deployments));
        }
        if let Some(at) = self.expires_before {
            filters.push(expires_before(at));
        }
        filters
    }
}
