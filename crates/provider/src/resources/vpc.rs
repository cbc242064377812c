//! VPC resource
//!
//! A created VPC is not usable until its peering info answers `200`; until
//! then the control plane answers that endpoint with `400`. A VPC removed
//! server-side answers `410`, which reads as absent.

use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use amqpctl_common::{Params, Record, ResourceKind, Result};

use super::{call, Reply, ResourceOperation, StatusPolicy, Verb, BAD_REQUEST, NO_CONTENT, OK};
use crate::client::{ApiClient, ApiRequest, RequestBody};
use crate::normalize::{enrich_vpc, normalize_id, Enriched};
use crate::poller::Observation;
use crate::record::into_record;

#[derive(Debug, Clone, Copy, Default)]
pub struct VpcResource;

impl ResourceOperation for VpcResource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Vpc
    }

    fn policy(&self, verb: Verb) -> StatusPolicy {
        match verb {
            Verb::Create | Verb::Lookup | Verb::List => StatusPolicy::success(&[OK]),
            Verb::Read | Verb::Update => StatusPolicy::success(&[OK]).or_gone(),
            Verb::Delete => StatusPolicy::success(&[NO_CONTENT]).or_gone(),
            Verb::Probe => StatusPolicy::success(&[OK]).or_pending(&[BAD_REQUEST]),
        }
    }
}

fn vpc_path(vpc_id: &str) -> String {
    format!("/api/vpcs/{}", vpc_id)
}

fn peering_info_path(vpc_id: &str) -> String {
    format!("/api/vpcs/{}/vpc-peering/info", vpc_id)
}

impl VpcResource {
    /// Create a VPC and wait until it is ready. The returned record carries
    /// the canonical string `id`.
    pub async fn create(&self, client: &ApiClient, params: &Params) -> Result<Record> {
        let request = ApiRequest::post("/api/vpcs", RequestBody::Json(Value::Object(params.clone())));
        let mut record = match call(client, self, Verb::Create, request).await? {
            Reply::Body(body) => into_record(body)?,
            _ => Record::new(),
        };

        let vpc_id = normalize_id(ResourceKind::Vpc, &mut record)?;
        self.wait_until_ready(client, &vpc_id).await?;
        Ok(record)
    }

    /// Poll the peering info until it answers `200`. `400` means not ready
    /// yet; any other status fails immediately.
    pub async fn wait_until_ready(&self, client: &ApiClient, vpc_id: &str) -> Result<Record> {
        let what = format!("vpc {}", vpc_id);
        let poller = client.poller(Duration::ZERO);

        poller
            .run(&what, move || self.observe_ready(client, vpc_id))
            .await?
            .into_ready(&what)
    }

    async fn observe_ready(&self, client: &ApiClient, vpc_id: &str) -> Result<Observation<Record>> {
        let request = ApiRequest::get(peering_info_path(vpc_id));
        Ok(match call(client, self, Verb::Probe, request).await? {
            Reply::Body(body) => Observation::Ready(into_record(body)?),
            Reply::Pending { status, body } => {
                warn!("wait until ready, status={} message={}", status, body);
                Observation::Pending
            }
            Reply::Gone => Observation::Absent,
        })
    }

    /// Read a VPC and merge its name from the peering info.
    ///
    /// `None` when the VPC is gone. A failed name lookup yields a partial
    /// result rather than an error.
    pub async fn read(&self, client: &ApiClient, vpc_id: &str) -> Result<Option<Enriched>> {
        let body = match call(client, self, Verb::Read, ApiRequest::get(vpc_path(vpc_id))).await? {
            Reply::Gone => return Ok(None),
            Reply::Body(body) | Reply::Pending { body, .. } => body,
        };

        let record = into_record(body)?;
        let lookup = self.read_name(client, vpc_id).await;
        Ok(Some(enrich_vpc(record, lookup)))
    }

    async fn read_name(&self, client: &ApiClient, vpc_id: &str) -> Result<Record> {
        match call(client, self, Verb::Lookup, ApiRequest::get(peering_info_path(vpc_id))).await? {
            Reply::Body(body) => into_record(body),
            _ => Ok(Record::new()),
        }
    }

    /// Update a VPC; `None` when it is gone
    pub async fn update(&self, client: &ApiClient, vpc_id: &str, params: &Params) -> Result<Option<Record>> {
        let request = ApiRequest::put(vpc_path(vpc_id), RequestBody::Json(Value::Object(params.clone())));
        match call(client, self, Verb::Update, request).await? {
            Reply::Gone => Ok(None),
            Reply::Body(body) | Reply::Pending { body, .. } => into_record(body).map(Some),
        }
    }

    /// Delete a VPC; deleting one that is already gone succeeds
    pub async fn delete(&self, client: &ApiClient, vpc_id: &str) -> Result<()> {
        call(client, self, Verb::Delete, ApiRequest::delete(vpc_path(vpc_id))).await?;
        Ok(())
    }
}
