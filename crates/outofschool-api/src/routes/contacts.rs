//! Contact payload shared by the provider, workshop and position routes.

use outofschool_providers::domain::contacts::{Address, Contact, Phone};
use serde::Deserialize;
use uuid::Uuid;

/// A contact as sent by the client. Contacts are matched by title, so `id`
/// is informational and ignored for new titles.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    /// Id of the contact as last read, if any.
    pub id: Option<Uuid>,
    /// Contact title, unique within the owner.
    pub title: String,
    /// Whether this should be the default contact.
    #[serde(default)]
    pub is_default: bool,
    /// Postal address.
    pub address: Option<Address>,
    /// Phone numbers.
    #[serde(default)]
    pub phones: Vec<Phone>,
    /// E-mail addresses.
    #[serde(default)]
    pub emails: Vec<String>,
}

impl From<ContactRequest> for Contact {
    fn from(request: ContactRequest) -> Self {
        Self {
            id: request.id,
            owner_id: None,
            title: request.title.trim().to_owned(),
            is_default: request.is_default,
            address: request.address,
            phones: request.phones,
            emails: request.emails,
        }
    }
}

/// Converts a request list into domain contacts, preserving order.
pub fn into_contacts(requests: Vec<ContactRequest>) -> Vec<Contact> {
    requests.into_iter().map(Contact::from).collect()
}
