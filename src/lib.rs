//! Client for the Teamwork Desk REST API.
//!
//! Each call on [`DeskClient`] performs one authenticated request and returns
//! the decoded JSON body. Non-200 responses are reported on stdout and still
//! returned as-is.

pub mod cli;
pub mod client;
pub mod config;
pub mod models;

pub use client::{DeskClient, Reply, status_diagnostic};
pub use config::DeskConfig;
pub use models::desk_request::{
    AttachmentId, CustomerRef, NewCustomerRequest, NewTicketRequest, NoteRequest, TicketId, UserId,
};
pub use models::helpdesk::Helpdesk;
