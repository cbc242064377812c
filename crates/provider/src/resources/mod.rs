//! Resource Implementations
//!
//! Each resource kind maps the verbs Create, Read, Update, Delete and List
//! onto control-plane requests. What a status code means is declared once
//! per kind through [`ResourceOperation`] instead of being matched inline at
//! every call site.

pub mod alarm;
pub mod plugin;
pub mod vpc;

use serde_json::Value;
use tracing::warn;

use amqpctl_common::{Error, ResourceKind, Result};

use crate::client::{ApiClient, ApiRequest};

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const NO_CONTENT: u16 = 204;
pub const BAD_REQUEST: u16 = 400;
pub const GONE: u16 = 410;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Read,
    Update,
    Delete,
    List,
    /// Secondary lookup of a sub-resource
    Lookup,
    /// Readiness check driven by the poller
    Probe,
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Create => write!(f, "create"),
            Verb::Read => write!(f, "read"),
            Verb::Update => write!(f, "update"),
            Verb::Delete => write!(f, "delete"),
            Verb::List => write!(f, "list"),
            Verb::Lookup => write!(f, "lookup"),
            Verb::Probe => write!(f, "probe"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Gone,
    Pending,
    Failure,
}

/// Status codes one verb accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub success: &'static [u16],
    pub gone: &'static [u16],
    pub pending: &'static [u16],
}

impl StatusPolicy {
    pub const fn success(codes: &'static [u16]) -> Self {
        Self {
            success: codes,
            gone: &[],
            pending: &[],
        }
    }

    /// Also treat 410 as a successful "resource no longer exists"
    pub const fn or_gone(self) -> Self {
        Self {
            gone: &[GONE],
            ..self
        }
    }

    /// Also treat `codes` as "not ready yet, poll again"
    pub const fn or_pending(self, codes: &'static [u16]) -> Self {
        Self {
            pending: codes,
            ..self
        }
    }

    pub fn classify(&self, status: u16) -> StatusClass {
        if self.success.contains(&status) {
            StatusClass::Success
        } else if self.gone.contains(&status) {
            StatusClass::Gone
        } else if self.pending.contains(&status) {
            StatusClass::Pending
        } else {
            StatusClass::Failure
        }
    }
}

/// Per-kind status-code semantics
pub trait ResourceOperation {
    fn kind(&self) -> ResourceKind;

    fn policy(&self, verb: Verb) -> StatusPolicy;
}

/// Interpreted control-plane answer
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Body(Value),
    Gone,
    Pending { status: u16, body: Value },
}

/// Execute `request` and interpret its status under `resource`'s policy for `verb`.
///
/// Any status outside the policy becomes [`Error::Api`] carrying the status
/// and the failure body unchanged.
pub async fn call<R>(client: &ApiClient, resource: &R, verb: Verb, request: ApiRequest) -> Result<Reply>
where
    R: ResourceOperation + ?Sized,
{
    let path = request.path.clone();
    let response = client.execute(request).await?;

    match resource.policy(verb).classify(response.status) {
        StatusClass::Success => Ok(Reply::Body(response.body)),
        StatusClass::Gone => {
            warn!("{} {} path={}: the {} has been deleted", verb, resource.kind(), path, resource.kind());
            Ok(Reply::Gone)
        }
        StatusClass::Pending => Ok(Reply::Pending {
            status: response.status,
            body: response.body,
        }),
        StatusClass::Failure => Err(Error::Api {
            operation: format!("{} {}", verb, resource.kind()),
            status: response.status,
            body: response.body,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: StatusPolicy = StatusPolicy::success(&[OK]).or_gone().or_pending(&[BAD_REQUEST]);

    #[test]
    fn test_classify() {
        assert_eq!(POLICY.classify(200), StatusClass::Success);
        assert_eq!(POLICY.classify(410), StatusClass::Gone);
        assert_eq!(POLICY.classify(400), StatusClass::Pending);
        assert_eq!(POLICY.classify(204), StatusClass::Failure);
        assert_eq!(POLICY.classify(500), StatusClass::Failure);
    }

    #[test]
    fn test_plain_success_policy_has_no_gone() {
        let policy = StatusPolicy::success(&[NO_CONTENT]);
        assert_eq!(policy.classify(204), StatusClass::Success);
        assert_eq!(policy.classify(410), StatusClass::Failure);
    }
}
