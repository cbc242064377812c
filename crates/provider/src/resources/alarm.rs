//! Alarm resource
//!
//! Every instance carries exactly one `notice` alarm. It can be neither
//! created nor deleted: create adopts the existing one and updates it,
//! delete only drops local tracking.

use serde_json::Value;
use tracing::{debug, info};

use amqpctl_common::{Error, Params, Record, ResourceKind, Result};

use super::{call, Reply, ResourceOperation, StatusPolicy, Verb, CREATED, NO_CONTENT, OK};
use crate::client::{ApiClient, ApiRequest, RequestBody};
use crate::normalize::{coerce_id, find_notice_alarm, normalize_id, NOTICE_ALARM};
use crate::record::{into_record, into_records, retain_attrs, string_attr};

/// Attributes forwarded to the control plane on create and update
pub const ALARM_ATTRIBUTES: &[&str] = &[
    "type",
    "enabled",
    "reminder_interval",
    "value_threshold",
    "value_calculation",
    "time_threshold",
    "vhost_regex",
    "queue_regex",
    "message_type",
    "recipients",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AlarmResource;

impl ResourceOperation for AlarmResource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Alarm
    }

    fn policy(&self, verb: Verb) -> StatusPolicy {
        match verb {
            Verb::Create => StatusPolicy::success(&[CREATED]),
            Verb::Update => StatusPolicy::success(&[CREATED]).or_gone(),
            Verb::Read => StatusPolicy::success(&[OK]).or_gone(),
            Verb::Delete => StatusPolicy::success(&[NO_CONTENT]).or_gone(),
            Verb::List | Verb::Lookup | Verb::Probe => StatusPolicy::success(&[OK]),
        }
    }
}

fn alarms_path(instance_id: i64) -> String {
    format!("/api/instances/{}/alarms", instance_id)
}

fn alarm_path(instance_id: i64, alarm_id: &str) -> String {
    format!("/api/instances/{}/alarms/{}", instance_id, alarm_id)
}

impl AlarmResource {
    /// Create an alarm. A `notice` alarm is adopted instead: the existing one
    /// is looked up and updated, and no new alarm is created.
    pub async fn create(&self, client: &ApiClient, instance_id: i64, params: &Params) -> Result<Record> {
        if string_attr(params, "type") == Some(NOTICE_ALARM) {
            debug!("alarm type is 'notice', adopting the existing one on instance {}", instance_id);
            return self.adopt_notice(client, instance_id, params).await;
        }

        let body = Value::Object(retain_attrs(params, ALARM_ATTRIBUTES));
        let request = ApiRequest::post(alarms_path(instance_id), RequestBody::Json(body));
        let mut record = match call(client, self, Verb::Create, request).await? {
            Reply::Body(body) => into_record(body)?,
            _ => Record::new(),
        };

        let id = normalize_id(ResourceKind::Alarm, &mut record)?;
        info!("created alarm {} on instance {}", id, instance_id);
        Ok(record)
    }

    async fn adopt_notice(&self, client: &ApiClient, instance_id: i64, params: &Params) -> Result<Record> {
        let alarms = self.list(client, instance_id).await?;
        let id = find_notice_alarm(instance_id, &alarms)?;
        info!("adopting notice alarm {} on instance {}", id, instance_id);

        self.update(client, instance_id, &id, params).await?;
        self.read(client, instance_id, &id).await?.ok_or_else(|| Error::Vanished {
            what: format!("notice alarm {} on instance {}", id, instance_id),
        })
    }

    /// Read an alarm; `None` when it is gone
    pub async fn read(&self, client: &ApiClient, instance_id: i64, alarm_id: &str) -> Result<Option<Record>> {
        match call(client, self, Verb::Read, ApiRequest::get(alarm_path(instance_id, alarm_id))).await? {
            Reply::Gone => Ok(None),
            Reply::Body(body) | Reply::Pending { body, .. } => {
                let mut record = into_record(body)?;
                coerce_id(ResourceKind::Alarm, &mut record)?;
                Ok(Some(record))
            }
        }
    }

    pub async fn update(&self, client: &ApiClient, instance_id: i64, alarm_id: &str, params: &Params) -> Result<Option<Record>> {
        let mut body = retain_attrs(params, ALARM_ATTRIBUTES);
        body.insert("id".to_string(), Value::String(alarm_id.to_string()));

        let request = ApiRequest::put(alarm_path(instance_id, alarm_id), RequestBody::Json(Value::Object(body)));
        match call(client, self, Verb::Update, request).await? {
            Reply::Gone => Ok(None),
            Reply::Body(body) | Reply::Pending { body, .. } => into_record(body).map(Some),
        }
    }

    /// Delete an alarm. Deleting the `notice` alarm is a no-op.
    ///
    /// Without a known type the alarm is read first, so the notice alarm is
    /// never deleted by id alone.
    pub async fn delete(&self, client: &ApiClient, instance_id: i64, alarm_id: &str, alarm_type: Option<&str>) -> Result<()> {
        let alarm_type = match alarm_type.filter(|t| !t.is_empty()) {
            Some(alarm_type) => alarm_type.to_string(),
            None => match self.read(client, instance_id, alarm_id).await? {
                Some(alarm) => string_attr(&alarm, "type").unwrap_or_default().to_string(),
                None => {
                    debug!("alarm {} on instance {} already gone", alarm_id, instance_id);
                    return Ok(());
                }
            },
        };

        if alarm_type == NOTICE_ALARM {
            debug!("alarm {} is the notice alarm, skipping deletion", alarm_id);
            return Ok(());
        }

        call(client, self, Verb::Delete, ApiRequest::delete(alarm_path(instance_id, alarm_id))).await?;
        Ok(())
    }

    pub async fn list(&self, client: &ApiClient, instance_id: i64) -> Result<Vec<Record>> {
        let mut alarms = match call(client, self, Verb::List, ApiRequest::get(alarms_path(instance_id))).await? {
            Reply::Body(body) => into_records(body)?,
            _ => Vec::new(),
        };
        for alarm in &mut alarms {
            coerce_id(ResourceKind::Alarm, alarm)?;
        }
        Ok(alarms)
    }
}
