pub type TicketId = u64;
pub type AttachmentId = u64;
pub type UserId = u64;

/// Form body as ordered key/value pairs. Keys may repeat (`attachmentIds[]`).
pub type FormFields = Vec<(&'static str, String)>;

const ATTACHMENT_IDS: &str = "attachmentIds[]";

/// A note (reply) to add to an existing ticket.
#[derive(Debug, Clone, Default)]
pub struct NoteRequest {
    pub body: String,
    /// e.g. "active", "closed". `None` leaves the ticket status unchanged.
    pub status: Option<String>,
    pub assigned_to: Option<UserId>,
    pub attachment_ids: Vec<AttachmentId>,
}

impl NoteRequest {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn assigned_to(mut self, user: UserId) -> Self {
        self.assigned_to = Some(user);
        self
    }

    pub fn attachments(mut self, ids: impl IntoIterator<Item = AttachmentId>) -> Self {
        self.attachment_ids.extend(ids);
        self
    }

    pub fn form_fields(&self) -> FormFields {
        let mut fields = vec![
            ("isDraft", "false".to_string()),
            ("type", "note".to_string()),
            ("body", self.body.clone()),
            ("status", self.status.clone().unwrap_or_default()),
            ("assignedTo", optional_id(self.assigned_to)),
        ];
        push_attachments(&mut fields, &self.attachment_ids);
        fields
    }
}

/// Who a new ticket is filed for. Either `id` or `email` is always set.
#[derive(Debug, Clone)]
pub struct CustomerRef {
    id: Option<u64>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl CustomerRef {
    /// An existing customer. The server matches on the id before anything else.
    pub fn by_id(id: u64) -> Self {
        Self {
            id: Some(id),
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    /// A customer looked up (or created) by email address.
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: Some(email.into()),
            first_name: None,
            last_name: None,
        }
    }

    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct NewTicketRequest {
    /// HTML body of the first message.
    pub message: String,
    pub subject: String,
    pub inbox_id: u64,
    pub customer: CustomerRef,
    pub attachment_ids: Vec<AttachmentId>,
}

impl NewTicketRequest {
    pub fn new(
        message: impl Into<String>,
        subject: impl Into<String>,
        inbox_id: u64,
        customer: CustomerRef,
    ) -> Self {
        Self {
            message: message.into(),
            subject: subject.into(),
            inbox_id,
            customer,
            attachment_ids: Vec::new(),
        }
    }

    pub fn attachments(mut self, ids: impl IntoIterator<Item = AttachmentId>) -> Self {
        self.attachment_ids.extend(ids);
        self
    }

    pub fn form_fields(&self) -> FormFields {
        let customer = &self.customer;
        let mut fields = vec![
            ("message", self.message.clone()),
            ("subject", self.subject.clone()),
            ("inboxId", self.inbox_id.to_string()),
            ("customerId", optional_id(customer.id)),
            ("customerEmail", customer.email.clone().unwrap_or_default()),
            ("customerFirstName", customer.first_name.clone().unwrap_or_default()),
            ("customerLastName", customer.last_name.clone().unwrap_or_default()),
        ];
        push_attachments(&mut fields, &self.attachment_ids);
        fields
    }
}

#[derive(Debug, Clone)]
pub struct NewCustomerRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewCustomerRequest {
    pub fn form_fields(&self) -> FormFields {
        vec![
            ("email", self.email.clone()),
            ("firstName", self.first_name.clone()),
            ("lastName", self.last_name.clone()),
        ]
    }
}

fn optional_id(id: Option<u64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn push_attachments(fields: &mut FormFields, ids: &[AttachmentId]) {
    fields.extend(ids.iter().map(|id| (ATTACHMENT_IDS, id.to_string())));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(fields: &'a FormFields, key: &str) -> Option<&'a str> {
        fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn note_defaults_send_empty_strings() {
        let fields = NoteRequest::new("Hello").form_fields();
        assert_eq!(
            fields,
            vec![
                ("isDraft", "false".to_string()),
                ("type", "note".to_string()),
                ("body", "Hello".to_string()),
                ("status", String::new()),
                ("assignedTo", String::new()),
            ]
        );
    }

    #[test]
    fn note_attachments_keep_order() {
        let fields = NoteRequest::new("see files")
            .status("closed")
            .assigned_to(42)
            .attachments([7, 3, 9])
            .form_fields();

        assert_eq!(value(&fields, "status"), Some("closed"));
        assert_eq!(value(&fields, "assignedTo"), Some("42"));
        let ids: Vec<&str> = fields
            .iter()
            .filter(|(k, _)| *k == "attachmentIds[]")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(ids, ["7", "3", "9"]);
    }

    #[test]
    fn ticket_by_email_leaves_customer_id_empty() {
        let fields = NewTicketRequest::new("<p>Hi</p>", "Help", 5, CustomerRef::by_email("a@b.com"))
            .form_fields();
        assert_eq!(value(&fields, "customerId"), Some(""));
        assert_eq!(value(&fields, "customerEmail"), Some("a@b.com"));
        assert_eq!(value(&fields, "customerFirstName"), Some(""));
        assert_eq!(value(&fields, "inboxId"), Some("5"));
        assert!(value(&fields, "attachmentIds[]").is_none());
    }

    #[test]
    fn ticket_by_id_with_names() {
        let customer = CustomerRef::by_id(99).first_name("Ada").last_name("Lovelace");
        let fields = NewTicketRequest::new("m", "s", 1, customer).attachments([11]).form_fields();
        assert_eq!(value(&fields, "customerId"), Some("99"));
        assert_eq!(value(&fields, "customerEmail"), Some(""));
        assert_eq!(value(&fields, "customerFirstName"), Some("Ada"));
        assert_eq!(value(&fields, "customerLastName"), Some("Lovelace"));
        assert_eq!(fields.last(), Some(&("attachmentIds[]", "11".to_string())));
    }

    #[test]
    fn customer_fields_use_camel_case() {
        let request = NewCustomerRequest {
            email: "x@y.z".to_string(),
            first_name: "X".to_string(),
            last_name: "Y".to_string(),
        };
        let keys: Vec<&str> = request.form_fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["email", "firstName", "lastName"]);
    }
}
