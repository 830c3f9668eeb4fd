//! Contact form: visitors send, admins read and reply.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use super::admin_client;
use crate::client::ApiClient;
use crate::output;

#[derive(Args, Debug)]
pub struct ContactCommand {
    #[command(subcommand)]
    pub command: ContactSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ContactSubcommand {
    /// Send a message through the public contact form
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },

    /// Mark a message as read
    Read { id: String },

    /// Reply to a message; marks it read
    Reply {
        id: String,
        #[arg(long)]
        text: String,
    },
}

pub async fn handle(service_url: &str, cmd: ContactCommand) -> Result<()> {
    match cmd.command {
        ContactSubcommand::Send {
            name,
            email,
            message,
        } => {
            let client = ApiClient::new(service_url)?;
            let sent = client
                .post(
                    "contact",
                    &json!({ "name": name, "email": email, "message": message }),
                )
                .await?;
            output::success("Message sent");
            if let Some(id) = sent["id"].as_str() {
                output::field("ID", id);
            }
        }
        ContactSubcommand::Read { id } => {
            let (client, _) = admin_client(service_url).await?;
            client.put(&format!("contact/{id}/read"), &json!({})).await?;
            output::success(&format!("Marked {id} as read"));
        }
        ContactSubcommand::Reply { id, text } => {
            let (client, _) = admin_client(service_url).await?;
            client
                .put(&format!("contact/{id}/reply"), &json!({ "reply": text }))
                .await?;
            output::success(&format!("Replied to {id}"));
        }
    }
    Ok(())
}
