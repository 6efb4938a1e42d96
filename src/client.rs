use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, multipart};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::DeskConfig;
use crate::models::desk_request::{NewCustomerRequest, NewTicketRequest, NoteRequest, TicketId};
use crate::models::helpdesk::Helpdesk;

const TICKETS_PATH: &str = "/desk/v1/tickets";
const CUSTOMERS_PATH: &str = "/desk/v1/customers.json";
const UPLOAD_PATH: &str = "/desk/v1/upload/attachment";

/// Status code and decoded body of one round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Line printed to stdout for a response that is not a plain 200.
pub fn status_diagnostic(status: u16) -> Option<String> {
    (status != 200).then(|| format!("error: status code is {status}"))
}

/// Where status diagnostics are written. Stdout unless replaced.
type DiagnosticSink = Arc<Mutex<dyn Write + Send>>;

/// Blocking client for the Desk REST API.
///
/// Authenticates with HTTP basic auth: the API key is the username and the
/// password is empty.
#[derive(Clone)]
pub struct DeskClient {
    http: Client,
    config: DeskConfig,
    diagnostics: DiagnosticSink,
}

impl fmt::Debug for DeskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeskClient")
            .field("http", &self.http)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DeskClient {
    pub fn new(config: DeskConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            config,
            diagnostics: Arc::new(Mutex::new(io::stdout())),
        })
    }

    /// Write `error: status code is ...` lines to `out` instead of stdout.
    pub fn with_diagnostics<W: Write + Send + 'static>(mut self, out: Arc<Mutex<W>>) -> Self {
        let sink: DiagnosticSink = out;
        self.diagnostics = sink;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    fn ticket_path(ticket_id: TicketId) -> String {
        format!("{TICKETS_PATH}/{ticket_id}.json")
    }

    /// Authenticated request for `path` relative to the installation URL.
    /// Pass the result to [`DeskClient::send`].
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .basic_auth(&self.config.api_key, Some(""))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    /// Execute a prepared request and decode the JSON body.
    ///
    /// A status other than 200 is reported but never turned into an error;
    /// the body is decoded and returned either way. Errors are limited to
    /// transport failures and bodies that are not JSON.
    pub fn send(&self, request: RequestBuilder) -> Result<Reply> {
        let request = request.build().context("failed to build request")?;
        let url = request.url().to_string();
        debug!("Desk Request: {} {}", request.method(), url);

        let resp = self
            .http
            .execute(request)
            .with_context(|| format!("failed to send request to {url}"))?;

        let status = resp.status().as_u16();
        if let Some(diagnostic) = status_diagnostic(status) {
            self.report(&diagnostic);
            warn!(status, %url, "Desk API returned a non-200 status");
        }

        let text = resp
            .text()
            .with_context(|| format!("failed to read response body from {url}"))?;
        let body: Value = serde_json::from_str(&text)
            .with_context(|| format!("failed to decode response from {url}"))?;

        debug!("Desk Response: {}", body);
        Ok(Reply { status, body })
    }

    fn report(&self, line: &str) {
        let mut out = self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(%error, "failed to write status diagnostic");
        }
    }
}

impl Helpdesk for DeskClient {
    fn name(&self) -> &'static str {
        "Teamwork Desk"
    }

    #[tracing::instrument(skip(self))]
    fn get_ticket(&self, ticket_id: TicketId) -> Result<Value> {
        let reply = self.send(self.get(&Self::ticket_path(ticket_id)))?;
        Ok(reply.into_body())
    }

    #[tracing::instrument(skip(self, note))]
    fn add_note(&self, ticket_id: TicketId, note: &NoteRequest) -> Result<Value> {
        info!("Adding note to ticket");
        let request = self
            .post(&Self::ticket_path(ticket_id))
            .form(&note.form_fields());
        Ok(self.send(request)?.into_body())
    }

    #[tracing::instrument(skip_all, fields(subject = %ticket.subject, inbox_id = ticket.inbox_id))]
    fn new_ticket(&self, ticket: &NewTicketRequest) -> Result<Value> {
        info!("Creating ticket");
        let request = self
            .post(&format!("{TICKETS_PATH}.json"))
            .form(&ticket.form_fields());
        Ok(self.send(request)?.into_body())
    }

    #[tracing::instrument(skip(self))]
    fn add_customer(&self, email: &str, first_name: &str, last_name: &str) -> Result<Value> {
        let customer = NewCustomerRequest {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        let request = self.post(CUSTOMERS_PATH).form(&customer.form_fields());
        Ok(self.send(request)?.into_body())
    }

    #[tracing::instrument(skip(self))]
    fn upload_file(&self, path: &Path) -> Result<Value> {
        // Read before building the request so a bad path never reaches the network.
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        debug!(size = bytes.len(), %file_name, "Uploading attachment");

        let form = multipart::Form::new()
            .text("isDraft", "true")
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        Ok(self.send(self.post(UPLOAD_PATH).multipart(form))?.into_body())
    }
}
