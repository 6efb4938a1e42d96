pub mod desk_request;
pub mod helpdesk;
