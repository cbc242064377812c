//! VPC Commands

use anyhow::{bail, Result};
use clap::Subcommand;

use amqpctl_provider::{ApiClient, VpcResource};

use super::parse_params;
use crate::output::{print_record, print_success, print_warning, OutputFormat};

#[derive(Subcommand)]
pub enum VpcCommands {
    /// Create a VPC and wait until it is ready
    Create {
        /// Parameters as key=value (e.g. name=prod subnet=10.56.72.0/24)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Get VPC details
    Read {
        /// VPC ID
        id: String,
    },

    /// Update a VPC
    Update {
        id: String,

        #[arg(long = "set", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Delete a VPC
    Delete {
        id: String,
    },
}

pub async fn execute(cmd: VpcCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        VpcCommands::Create { params } => {
            let params = parse_params(&params)?;
            let vpc = VpcResource.create(client, &params).await?;
            print_success("VPC created and ready");
            print_record(&vpc, format);
        }

        VpcCommands::Read { id } => match VpcResource.read(client, &id).await? {
            Some(enriched) => {
                if let Some(reason) = &enriched.degraded {
                    print_warning(&format!("vpc_name unavailable: {}", reason));
                }
                print_record(&enriched.record, format);
            }
            None => bail!("VPC {} has been deleted", id),
        },

        VpcCommands::Update { id, params } => {
            let params = parse_params(&params)?;
            match VpcResource.update(client, &id, &params).await? {
                Some(_) => print_success(&format!("VPC '{}' updated", id)),
                None => print_warning(&format!("VPC '{}' has been deleted", id)),
            }
        }

        VpcCommands::Delete { id } => {
            VpcResource.delete(client, &id).await?;
            print_success(&format!("VPC '{}' deleted", id));
        }
    }

    Ok(())
}
