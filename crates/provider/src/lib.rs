//! amqpctl Provider
//!
//! Reconciles desired configuration for broker plugins, VPCs and alarms
//! against the CloudAMQP control-plane API. Mutations the control plane
//! applies asynchronously are followed by a bounded, cancellable poll until
//! the resource reaches a terminal state.

pub mod client;
pub mod normalize;
pub mod poller;
pub mod record;
pub mod resources;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, ApiRequest, ApiResponse, HttpExecutor, Method, RequestBody, RequestExecutor};
pub use normalize::Enriched;
pub use poller::{Observation, PollConfig, Poller, Settled};
pub use resources::{alarm::AlarmResource, plugin::PluginResource, vpc::VpcResource};
