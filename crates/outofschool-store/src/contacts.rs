//! Contact rows shared by providers, workshops and positions.

use outofschool_core::error::DomainError;
use outofschool_core::repository::ChildWrite;
use outofschool_providers::domain::contacts::{Address, Contact, Phone};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::support::{infrastructure, persisted_id, sort_order};

/// Which kind of aggregate owns a contact row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOwner {
    /// A provider.
    Provider,
    /// A workshop.
    Workshop,
    /// A position.
    Position,
}

impl ContactOwner {
    /// Value stored in the `owner_kind` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Workshop => "workshop",
            Self::Position => "position",
        }
    }
}

#[derive(Debug, FromRow)]
struct ContactRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    is_default: bool,
    address: Option<Json<Address>>,
    phones: Json<Vec<Phone>>,
    emails: Vec<String>,
}

impl ContactRow {
    fn into_contact(self) -> Contact {
        Contact {
            id: Some(self.id),
            owner_id: Some(self.owner_id),
            title: self.title,
            is_default: self.is_default,
            address: self.address.map(|Json(address)| address),
            phones: self.phones.0,
            emails: self.emails,
        }
    }
}

/// Loads an owner's contacts in stored order.
pub(crate) async fn load(
    conn: &mut PgConnection,
    owner: ContactOwner,
    owner_id: Uuid,
) -> Result<Vec<Contact>, DomainError> {
    let rows: Vec<ContactRow> = sqlx::query_as(
        r"
        SELECT id, owner_id, title, is_default, address, phones, emails
        FROM contacts
        WHERE owner_kind = $1 AND owner_id = $2
        ORDER BY sort_order, id
        ",
    )
    .bind(owner.as_str())
    .bind(owner_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(infrastructure)?;

    Ok(rows.into_iter().map(ContactRow::into_contact).collect())
}

/// Applies contact writes in order. `contacts` is the owner's collection
/// after reconciliation and decides each row's `sort_order`.
pub(crate) async fn apply(
    conn: &mut PgConnection,
    owner: ContactOwner,
    owner_id: Uuid,
    contacts: &[Contact],
    writes: &[ChildWrite<Contact>],
) -> Result<(), DomainError> {
    for write in writes {
        let contact = write.child();
        let id = persisted_id(contact)?;
        let query = match write {
            ChildWrite::Delete(_) => {
                sqlx::query("DELETE FROM contacts WHERE id = $1 AND owner_kind = $2 AND owner_id = $3")
                    .bind(id)
                    .bind(owner.as_str())
                    .bind(owner_id)
            }
            ChildWrite::Update(_) => sqlx::query(
                r"
                UPDATE contacts
                SET sort_order = $4, title = $5, is_default = $6,
                    address = $7, phones = $8, emails = $9
                WHERE id = $1 AND owner_kind = $2 AND owner_id = $3
                ",
            )
            .bind(id)
            .bind(owner.as_str())
            .bind(owner_id)
            .bind(sort_order(contacts, id)?)
            .bind(&contact.title)
            .bind(contact.is_default)
            .bind(contact.address.as_ref().map(Json))
            .bind(Json(&contact.phones))
            .bind(&contact.emails),
            ChildWrite::Create(_) => sqlx::query(
                r"
                INSERT INTO contacts
                    (id, owner_kind, owner_id, sort_order, title, is_default,
                     address, phones, emails)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(id)
            .bind(owner.as_str())
            .bind(owner_id)
            .bind(sort_order(contacts, id)?)
            .bind(&contact.title)
            .bind(contact.is_default)
            .bind(contact.address.as_ref().map(Json))
            .bind(Json(&contact.phones))
            .bind(&contact.emails),
        };
        query.execute(&mut *conn).await.map_err(infrastructure)?;
    }
    Ok(())
}
