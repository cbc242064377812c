//! Plugin Commands

use anyhow::Result;
use clap::{ArgAction, Subcommand};

use amqpctl_provider::{ApiClient, PluginResource};

use crate::output::{print_record, print_records, print_success, OutputFormat};

#[derive(Subcommand)]
pub enum PluginCommands {
    /// List plugins on an instance
    List {
        /// Instance ID
        #[arg(long)]
        instance_id: i64,

        /// Community plugins instead of standard ones
        #[arg(long)]
        community: bool,
    },

    /// Enable a plugin and wait until it is active
    Enable {
        #[arg(long)]
        instance_id: i64,

        /// Plugin name
        name: String,

        #[arg(long)]
        community: bool,
    },

    /// Set a plugin's enabled flag and wait for it to apply
    Update {
        #[arg(long)]
        instance_id: i64,

        name: String,

        #[arg(long, action = ArgAction::Set)]
        enabled: bool,

        #[arg(long)]
        community: bool,
    },

    /// Disable a plugin and wait until it is gone
    Disable {
        #[arg(long)]
        instance_id: i64,

        name: String,

        #[arg(long)]
        community: bool,
    },
}

fn resource(community: bool) -> PluginResource {
    if community {
        PluginResource::community()
    } else {
        PluginResource::standard()
    }
}

pub async fn execute(cmd: PluginCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        PluginCommands::List { instance_id, community } => {
            let plugins = resource(community).list(client, instance_id).await?;
            print_records(&plugins, format);
        }

        PluginCommands::Enable { instance_id, name, community } => {
            let plugin = resource(community).enable(client, instance_id, &name).await?;
            print_success(&format!("Plugin '{}' enabled", name));
            print_record(&plugin, format);
        }

        PluginCommands::Update { instance_id, name, enabled, community } => {
            let plugin = resource(community).update(client, instance_id, &name, enabled).await?;
            print_success(&format!("Plugin '{}' updated", name));
            print_record(&plugin, format);
        }

        PluginCommands::Disable { instance_id, name, community } => {
            resource(community).delete(client, instance_id, &name).await?;
            print_success(&format!("Plugin '{}' disabled", name));
        }
    }

    Ok(())
}
