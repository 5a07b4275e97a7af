//! The rotation decision engine.
//!
//! Rules are evaluated in a fixed order and the first one that fires
//! decides the action. Evaluation is pure: it only reads the snapshot the
//! credential belongs to.

use crate::models::action::Action;
use crate::models::credential::CredentialType;
use crate::models::criteria::RegenerationCriteria;
use crate::models::variable::UpdateMode;
use crate::state::collectors::{referencing, siblings, signed, signer, versions};
use crate::state::filters::{
    self, active, and, any, certificate_authority, deployed, expires_before, latest, not, or,
    signing, transitional, Filter,
};
use crate::state::view::CredentialRef;
use serde::Serialize;

/// An action together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub action: Action,
    pub reason: &'static str,
}

impl Verdict {
    fn new(action: Action, reason: &'static str) -> Self {
        Self { action, reason }
    }
}

/// Rule set compiled for one [`RegenerationCriteria`]; reuse it across
/// many credentials of the same snapshot.
#[derive(Debug, Clone)]
pub struct Rules {
    ignore_update_mode: bool,
    outstanding_deployment: Filter,
    aged: Option<Filter>,
    expiring_certificate: Option<Filter>,
    healthy_signer: Option<Filter>,
    self_signed: Filter,
    superseded_signer: Filter,
    mark_transitional: Filter,
    unmark_transitional: Filter,
    cleanable: Filter,
}

impl Rules {
    pub fn new(criteria: &RegenerationCriteria) -> Self {
        let healthy_signer = criteria.expires_before.map(|at| {
            let healthy = not(expires_before(at));
            or([
                any(signer().filter(healthy.clone())),
                any(signer().then(versions()).filter(and([active(), healthy]))),
            ])
        });

        Self {
            ignore_update_mode: criteria.ignore_update_mode,
            outstanding_deployment: and([
                latest(),
                Filter::new(|c| {
                    c.path()
                        .is_some_and(|p| !p.deployments.is_subset(&c.deployments))
                }),
            ]),
            aged: criteria
                .older_than
                .map(|at| and([latest(), filters::older_than(at)])),
            expiring_certificate: criteria
                .expires_before
                .map(|at| and([filters::types(&[CredentialType::Certificate]), expires_before(at)])),
            healthy_signer,
            self_signed: filters::self_signed(),
            superseded_signer: and([
                latest(),
                any(signer().filter(not(active()))),
                Filter::new(|c| {
                    let Some(issuer) = c.signer() else {
                        return false;
                    };
                    c.chain()
                        .any(|ca| ca.name == issuer.name && ca.active() && ca.signing.is_signer())
                }),
            ]),
            mark_transitional: and([
                signing(),
                not(latest()),
                not(transitional()),
                Filter::new(|c| {
                    c.path().and_then(|p| p.latest()).is_some_and(|l| {
                        l.transitional && l.version_created_at > c.version_created_at
                    })
                }),
            ]),
            unmark_transitional: and([
                transitional(),
                not(latest()),
                certificate_authority(true),
                not(any(signed().filter(deployed()))),
                any(siblings().filter(and([active(), any(signed().filter(deployed()))]))),
            ]),
            cleanable: and([
                not(deployed()),
                not(any(referencing().filter(deployed()))),
                not(any(signed().filter(deployed()))),
                Filter::new(|c| c.credential_type.supports_version_deletion()),
            ]),
        }
    }

    pub fn next_action(&self, credential: CredentialRef<'_>) -> Action {
        self.evaluate(credential).action
    }

    pub fn evaluate(&self, c: CredentialRef<'_>) -> Verdict {
        if !self.ignore_update_mode
            && c.path().is_some_and(|p| p.update_mode() == UpdateMode::NoOverwrite)
        {
            return Verdict::new(Action::NoOverwrite, "update mode is no-overwrite");
        }

        if self.outstanding_deployment.matches(c) {
            return Verdict::new(Action::BoshDeploy, "latest version not deployed everywhere");
        }

        if self.aged.as_ref().is_some_and(|f| f.matches(c)) {
            if c.credential_type.regenerable() {
                return Verdict::new(Action::Regenerate, "older than threshold");
            }
            return Verdict::new(Action::None, "older than threshold but not regenerable");
        }

        if self.expiring_certificate.as_ref().is_some_and(|f| f.matches(c)) {
            if self.self_signed.matches(c) {
                return Verdict::new(Action::Regenerate, "expiring self-signed certificate");
            }
            if self.healthy_signer.as_ref().is_some_and(|f| f.matches(c)) {
                return Verdict::new(Action::Regenerate, "expiring, healthy signer available");
            }
            return Verdict::new(Action::None, "expiring, but signer expires too");
        }

        if self.superseded_signer.matches(c) {
            return Verdict::new(Action::Regenerate, "signed by superseded CA");
        }

        if self.mark_transitional.matches(c) {
            return Verdict::new(Action::MarkTransitional, "newer CA version is transitional");
        }

        if self.unmark_transitional.matches(c) {
            return Verdict::new(Action::UnMarkTransitional, "consumers moved to the active CA");
        }

        if self.cleanable.matches(c) {
            return Verdict::new(Action::CleanUp, "no deployment depends on this version");
        }

        Verdict::new(Action::None, "up to date")
    }
}

impl CredentialRef<'_> {
    /// The single next lifecycle action for this version under `criteria`.
    pub fn next_action(&self, criteria: &RegenerationCriteria) -> Action {
        Rules::new(criteria).next_action(*self)
    }
}
