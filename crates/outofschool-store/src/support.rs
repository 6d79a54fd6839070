//! Helpers shared by the Postgres stores.

use outofschool_core::error::DomainError;
use outofschool_core::repository::ChildWrite;
use outofschool_reconcile::child::OwnedChild;
use sqlx::PgConnection;
use uuid::Uuid;

pub(crate) fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

/// Classifies a failed write against a child whose id the caller chose.
///
/// A unique violation on insert means the id already belongs to a child of
/// another aggregate, which the caller has to correct.
pub(crate) fn caller_keyed_write_error<C>(
    write: &ChildWrite<C>,
    label: &'static str,
    id: Uuid,
    err: sqlx::Error,
) -> DomainError {
    let clashes = matches!(write, ChildWrite::Create(_))
        && err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
    if clashes {
        DomainError::Validation(format!("The {label} id {id} is already in use."))
    } else {
        infrastructure(err)
    }
}

/// Turns a version-guarded root update into a conflict when it matched no
/// row, reading the version the row holds now to tell a stale write from a
/// deleted aggregate.
pub(crate) async fn ensure_version(
    conn: &mut PgConnection,
    table: &'static str,
    rows_affected: u64,
    aggregate_id: Uuid,
    expected: i64,
) -> Result<(), DomainError> {
    if rows_affected > 0 {
        return Ok(());
    }

    let sql = format!("SELECT version FROM {table} WHERE id = $1");
    let current: Option<i64> = sqlx::query_scalar(&sql)
        .bind(aggregate_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(infrastructure)?;
    tracing::warn!(%aggregate_id, expected, ?current, "version guard rejected commit");
    Err(DomainError::conflict(aggregate_id, expected, current))
}

/// The id every child write must carry by the time it reaches a store.
pub(crate) fn persisted_id<C: OwnedChild>(child: &C) -> Result<Uuid, DomainError> {
    child
        .id()
        .ok_or_else(|| DomainError::Infrastructure("child write without an id".to_owned()))
}

/// Position of the child with `id` in the aggregate's collection.
pub(crate) fn sort_order<C: OwnedChild>(children: &[C], id: Uuid) -> Result<i32, DomainError> {
    let index = children
        .iter()
        .position(|child| child.id() == Some(id))
        .ok_or_else(|| {
            DomainError::Infrastructure(format!("child {id} is not part of the aggregate"))
        })?;
    i32::try_from(index)
        .map_err(|_| DomainError::Infrastructure(format!("collection too large: {index}")))
}

#[cfg(test)]
mod tests {
    use outofschool_providers::domain::contacts::Contact;

    use super::*;

    fn persisted(title: &str) -> Contact {
        Contact {
            id: Some(Uuid::new_v4()),
            ..Contact::new(title, None, Vec::new())
        }
    }

    #[test]
    fn test_sort_order_is_index_in_collection() {
        let contacts = vec![persisted("Office"), persisted("Branch")];

        let order = sort_order(&contacts, contacts[1].id.unwrap()).unwrap();

        assert_eq!(order, 1);
    }

    #[test]
    fn test_sort_order_of_foreign_child_is_infrastructure_error() {
        let contacts = vec![persisted("Office")];

        let result = sort_order(&contacts, Uuid::new_v4());

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_non_database_error_on_create_stays_infrastructure() {
        let contact = persisted("Office");
        let id = contact.id.unwrap();

        let err = caller_keyed_write_error(
            &ChildWrite::Create(contact),
            "contact",
            id,
            sqlx::Error::RowNotFound,
        );

        assert!(matches!(err, DomainError::Infrastructure(_)));
    }

    #[test]
    fn test_persisted_id_requires_an_id() {
        let result = persisted_id(&Contact::new("Office", None, Vec::new()));

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
