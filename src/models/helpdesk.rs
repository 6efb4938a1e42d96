use anyhow::Result;
use serde_json::Value;
use std::path::Path;

use super::desk_request::{NewTicketRequest, NoteRequest, TicketId};

/// Operations a helpdesk backend offers.
///
/// Every method performs one request and hands back the decoded JSON body,
/// including error payloads for non-200 responses.
pub trait Helpdesk: Send + Sync {
    /// Get the name of the helpdesk
    fn name(&self) -> &'static str;

    fn get_ticket(&self, ticket_id: TicketId) -> Result<Value>;
    fn add_note(&self, ticket_id: TicketId, note: &NoteRequest) -> Result<Value>;
    fn new_ticket(&self, ticket: &NewTicketRequest) -> Result<Value>;
    fn add_customer(&self, email: &str, first_name: &str, last_name: &str) -> Result<Value>;
    /// Upload a file as a draft attachment. The response carries the id to
    /// reference from later notes or tickets.
    fn upload_file(&self, path: &Path) -> Result<Value>;
}
