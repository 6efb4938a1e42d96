use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::models::desk_request::{CustomerRef, NewTicketRequest, NoteRequest};
use crate::models::helpdesk::Helpdesk;

// ----------------------------------------------------------------------
// Command line arguments
// ----------------------------------------------------------------------
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML file with `desk.endpoint` and `desk.api_key`
    #[arg(long, default_value = "config.yml")]
    pub config: PathBuf,

    /// Installation URL, e.g. https://acme.teamwork.com
    #[arg(long, env = "DESK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API key (see your profile's API keys page)
    #[arg(long, env = "DESK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one ticket by id
    Ticket { id: u64 },

    /// Add a note to an existing ticket
    Note {
        ticket_id: u64,
        body: String,
        /// New ticket status, e.g. active or closed
        #[arg(long)]
        status: Option<String>,
        /// User id to assign the ticket to
        #[arg(long)]
        assigned_to: Option<u64>,
        /// Attachment id from a previous upload (repeatable)
        #[arg(long = "attachment")]
        attachments: Vec<u64>,
    },

    /// Create a new ticket
    NewTicket {
        #[arg(long)]
        subject: String,
        /// HTML message body
        #[arg(long)]
        message: String,
        #[arg(long = "inbox")]
        inbox_id: u64,
        #[arg(long, conflicts_with = "customer_email", required_unless_present = "customer_email")]
        customer_id: Option<u64>,
        #[arg(long)]
        customer_email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long = "attachment")]
        attachments: Vec<u64>,
    },

    /// Create a customer
    Customer {
        email: String,
        first_name: String,
        last_name: String,
    },

    /// Upload a file as a draft attachment
    Upload { path: PathBuf },
}

impl Command {
    pub fn run(self, desk: &dyn Helpdesk) -> Result<Value> {
        info!(desk = desk.name(), "running {:?}", self);
        match self {
            Command::Ticket { id } => desk.get_ticket(id),
            Command::Note {
                ticket_id,
                body,
                status,
                assigned_to,
                attachments,
            } => {
                let note = NoteRequest {
                    body,
                    status,
                    assigned_to,
                    attachment_ids: attachments,
                };
                desk.add_note(ticket_id, &note)
            }
            Command::NewTicket {
                subject,
                message,
                inbox_id,
                customer_id,
                customer_email,
                first_name,
                last_name,
                attachments,
            } => {
                let mut customer = match (customer_id, customer_email) {
                    (Some(id), _) => CustomerRef::by_id(id),
                    (None, Some(email)) => CustomerRef::by_email(email),
                    (None, None) => anyhow::bail!("either --customer-id or --customer-email is required"),
                };
                if let Some(first_name) = first_name {
                    customer = customer.first_name(first_name);
                }
                if let Some(last_name) = last_name {
                    customer = customer.last_name(last_name);
                }
                let ticket = NewTicketRequest::new(message, subject, inbox_id, customer)
                    .attachments(attachments);
                desk.new_ticket(&ticket)
            }
            Command::Customer {
                email,
                first_name,
                last_name,
            } => desk.add_customer(&email, &first_name, &last_name),
            Command::Upload { path } => desk.upload_file(&path),
        }
    }
}
