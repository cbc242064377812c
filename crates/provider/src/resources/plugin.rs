//! Plugin and community plugin resources
//!
//! Enabling, updating and disabling a plugin are accepted with `204` and
//! applied asynchronously on the broker, so every mutation waits for the
//! installed-plugins list to reflect it.

use tracing::{debug, info};

use amqpctl_common::{Record, ResourceKind, Result};

use super::{call, Reply, ResourceOperation, StatusPolicy, Verb, NO_CONTENT, OK};
use crate::client::{ApiClient, ApiRequest, RequestBody};
use crate::poller::{Observation, Settled};
use crate::record::{bool_attr, into_records, string_attr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginSource {
    /// Plugins shipped with the broker
    Standard,
    /// Third-party plugins installed on demand
    Community,
}

#[derive(Debug, Clone, Copy)]
pub struct PluginResource {
    source: PluginSource,
}

impl ResourceOperation for PluginResource {
    fn kind(&self) -> ResourceKind {
        match self.source {
            PluginSource::Standard => ResourceKind::Plugin,
            PluginSource::Community => ResourceKind::PluginCommunity,
        }
    }

    fn policy(&self, verb: Verb) -> StatusPolicy {
        match verb {
            Verb::Create | Verb::Update => StatusPolicy::success(&[NO_CONTENT]),
            Verb::Delete => StatusPolicy::success(&[NO_CONTENT]).or_gone(),
            Verb::Read | Verb::List | Verb::Lookup | Verb::Probe => StatusPolicy::success(&[OK]),
        }
    }
}

impl PluginResource {
    pub fn standard() -> Self {
        Self {
            source: PluginSource::Standard,
        }
    }

    pub fn community() -> Self {
        Self {
            source: PluginSource::Community,
        }
    }

    pub fn source(&self) -> PluginSource {
        self.source
    }

    fn collection_path(&self, instance_id: i64) -> String {
        match self.source {
            PluginSource::Standard => format!("/api/instances/{}/plugins", instance_id),
            PluginSource::Community => format!("/api/instances/{}/plugins/community", instance_id),
        }
    }

    fn item_path(&self, instance_id: i64, name: &str) -> String {
        format!("{}/{}", self.collection_path(instance_id), name)
    }

    /// All plugins of this source on the instance
    pub async fn list(&self, client: &ApiClient, instance_id: i64) -> Result<Vec<Record>> {
        let reply = call(client, self, Verb::List, ApiRequest::get(self.collection_path(instance_id))).await?;
        match reply {
            Reply::Body(body) => into_records(body),
            _ => Ok(Vec::new()),
        }
    }

    /// The named plugin, or `None` when it is not listed
    pub async fn read(&self, client: &ApiClient, instance_id: i64, name: &str) -> Result<Option<Record>> {
        let plugins = self.list(client, instance_id).await?;
        Ok(plugins
            .into_iter()
            .find(|plugin| string_attr(plugin, "name") == Some(name)))
    }

    /// Enable (install) a plugin and wait until it reports enabled
    pub async fn enable(&self, client: &ApiClient, instance_id: i64, name: &str) -> Result<Record> {
        let form = vec![("name".to_string(), name.to_string())];
        call(
            client,
            self,
            Verb::Create,
            ApiRequest::post(self.collection_path(instance_id), RequestBody::Form(form)),
        )
        .await?;

        wait_until_enabled(client, instance_id, name, true).await
    }

    /// Set the enabled flag and wait until the broker reflects it.
    ///
    /// Convergence is judged on `enabled` alone; other fields may still drift.
    pub async fn update(&self, client: &ApiClient, instance_id: i64, name: &str, enabled: bool) -> Result<Record> {
        let form = vec![
            ("name".to_string(), name.to_string()),
            ("enabled".to_string(), enabled.to_string()),
        ];
        call(
            client,
            self,
            Verb::Update,
            ApiRequest::put(self.collection_path(instance_id), RequestBody::Form(form)),
        )
        .await?;

        wait_until_enabled(client, instance_id, name, enabled).await
    }

    /// Disable (uninstall) a plugin and wait for the change to land.
    ///
    /// A community plugin is done once it is no longer listed; a standard
    /// plugin stays listed and is done once it reports disabled.
    pub async fn delete(&self, client: &ApiClient, instance_id: i64, name: &str) -> Result<()> {
        call(client, self, Verb::Delete, ApiRequest::delete(self.item_path(instance_id, name))).await?;

        match self.source {
            PluginSource::Community => wait_until_uninstalled(client, instance_id, name).await,
            PluginSource::Standard => wait_until_enabled(client, instance_id, name, false).await.map(|_| ()),
        }
    }
}

/// Installed plugins (community ones included) are reported by the standard list
const INSTALLED: PluginResource = PluginResource {
    source: PluginSource::Standard,
};

async fn wait_until_enabled(client: &ApiClient, instance_id: i64, name: &str, desired: bool) -> Result<Record> {
    let what = format!("plugin {} on instance {}", name, instance_id);
    let poller = client.poller(client.poll_settings().initial_delay());

    poller
        .run(&what, move || observe_enabled(client, instance_id, name, desired))
        .await?
        .into_ready(&what)
}

async fn observe_enabled(
    client: &ApiClient,
    instance_id: i64,
    name: &str,
    desired: bool,
) -> Result<Observation<Record>> {
    let plugin = INSTALLED.read(client, instance_id, name).await?;
    Ok(match plugin {
        Some(plugin) if bool_attr(&plugin, "enabled") == Some(desired) => Observation::Ready(plugin),
        Some(plugin) => {
            let current = plugin.get("enabled").cloned().unwrap_or_default();
            debug!("plugin {} enabled={} waiting for enabled={}", name, current, desired);
            Observation::Pending
        }
        None => Observation::Pending,
    })
}

async fn wait_until_uninstalled(client: &ApiClient, instance_id: i64, name: &str) -> Result<()> {
    let what = format!("plugin {} on instance {}", name, instance_id);
    let poller = client.poller(client.poll_settings().initial_delay());

    let settled = poller
        .run(&what, move || observe_uninstalled(client, instance_id, name))
        .await?;

    if let Settled::Absent = settled {
        info!("{} uninstalled", what);
    }
    Ok(())
}

async fn observe_uninstalled(client: &ApiClient, instance_id: i64, name: &str) -> Result<Observation<()>> {
    Ok(match INSTALLED.read(client, instance_id, name).await? {
        Some(_) => Observation::Pending,
        None => Observation::Absent,
    })
}
