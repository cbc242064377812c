//! amqpctl CLI
//!
//! Command-line interface for plugins, VPCs and alarms on hosted
//! message-broker instances.

pub mod commands;
pub mod output;
