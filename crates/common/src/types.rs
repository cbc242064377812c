//! Core types for amqpctl

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Observed state of a remote resource as returned by the control plane
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Desired parameters, validated upstream and forwarded as-is
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Resource kinds managed by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Plugin,
    PluginCommunity,
    Vpc,
    Alarm,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Plugin => write!(f, "plugin"),
            ResourceKind::PluginCommunity => write!(f, "plugin_community"),
            ResourceKind::Vpc => write!(f, "vpc"),
            ResourceKind::Alarm => write!(f, "alarm"),
        }
    }
}

/// Identity of a sub-resource under a broker instance.
///
/// The resource id is assigned by the control plane (or is the plugin name)
/// and never changes for the lifetime of the resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub instance_id: i64,
    pub id: String,
}

impl ResourceIdentity {
    pub fn new(instance_id: i64, id: impl Into<String>) -> Self {
        Self {
            instance_id,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.id, self.instance_id)
    }
}

/// Parses the composite import form `{resource_id},{instance_id}`.
impl FromStr for ResourceIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, instance) = s.split_once(',').ok_or_else(|| {
            Error::InvalidIdentity(format!(
                "missing instance identifier in '{}': {{resource_id}},{{instance_id}}",
                s
            ))
        })?;

        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidIdentity(format!("empty resource id in '{}'", s)));
        }

        let instance_id: i64 = instance
            .trim()
            .parse()
            .map_err(|_| Error::InvalidIdentity(format!("invalid instance id in '{}'", s)))?;
        if instance_id == 0 {
            return Err(Error::InvalidIdentity(format!("instance id is zero in '{}'", s)));
        }

        Ok(Self::new(instance_id, id))
    }
}
