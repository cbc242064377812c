//! Alarm Commands

use anyhow::{bail, Result};
use clap::Subcommand;

use amqpctl_common::ResourceIdentity;
use amqpctl_provider::{AlarmResource, ApiClient};

use super::parse_params;
use crate::output::{print_record, print_records, print_success, print_warning, OutputFormat};

#[derive(Subcommand)]
pub enum AlarmCommands {
    /// List alarms on an instance
    List {
        #[arg(long)]
        instance_id: i64,
    },

    /// Create an alarm (a notice alarm is adopted, not created)
    Create {
        #[arg(long)]
        instance_id: i64,

        /// Parameters as key=value (e.g. type=cpu value_threshold=90)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Get alarm details
    Read {
        /// Alarm ID, or `{alarm_id},{instance_id}`
        id: String,

        #[arg(long)]
        instance_id: Option<i64>,
    },

    /// Update an alarm
    Update {
        #[arg(long)]
        instance_id: i64,

        id: String,

        #[arg(long = "set", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Delete an alarm (no-op for the notice alarm)
    Delete {
        #[arg(long)]
        instance_id: i64,

        id: String,

        /// Alarm type; read from the control plane when omitted
        #[arg(long = "type")]
        alarm_type: Option<String>,
    },
}

fn identity(id: &str, instance_id: Option<i64>) -> Result<ResourceIdentity> {
    if id.contains(',') {
        return Ok(id.parse()?);
    }
    match instance_id {
        Some(instance_id) => Ok(ResourceIdentity::new(instance_id, id)),
        None => bail!("missing instance identifier: pass --instance-id or {{alarm_id}},{{instance_id}}"),
    }
}

pub async fn execute(cmd: AlarmCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        AlarmCommands::List { instance_id } => {
            let alarms = AlarmResource.list(client, instance_id).await?;
            print_records(&alarms, format);
        }

        AlarmCommands::Create { instance_id, params } => {
            let params = parse_params(&params)?;
            let alarm = AlarmResource.create(client, instance_id, &params).await?;
            print_success("Alarm created");
            print_record(&alarm, format);
        }

        AlarmCommands::Read { id, instance_id } => {
            let identity = identity(&id, instance_id)?;
            match AlarmResource.read(client, identity.instance_id, &identity.id).await? {
                Some(alarm) => print_record(&alarm, format),
                None => bail!("alarm {} has been deleted", identity),
            }
        }

        AlarmCommands::Update { instance_id, id, params } => {
            let params = parse_params(&params)?;
            match AlarmResource.update(client, instance_id, &id, &params).await? {
                Some(_) => print_success(&format!("Alarm '{}' updated", id)),
                None => print_warning(&format!("Alarm '{}' has been deleted", id)),
            }
        }

        AlarmCommands::Delete { instance_id, id, alarm_type } => {
            AlarmResource.delete(client, instance_id, &id, alarm_type.as_deref()).await?;
            print_success(&format!("Alarm '{}' deleted", id));
        }
    }

    Ok(())
}
