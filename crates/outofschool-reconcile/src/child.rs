//! Owned child abstraction.

use std::fmt::Debug;

use uuid::Uuid;

/// A child element that exists only as part of an aggregate.
///
/// Implementors supply the explicit field mapping used when an existing
/// child is overwritten with the caller's desired values.
pub trait OwnedChild: Clone + Debug + PartialEq + Send + Sync {
    /// The surrogate id, if the child has been persisted or the caller
    /// pre-assigned one.
    fn id(&self) -> Option<Uuid>;

    /// Replaces the surrogate id.
    fn set_id(&mut self, id: Option<Uuid>);

    /// The owning aggregate's id, if already assigned.
    fn owner_id(&self) -> Option<Uuid>;

    /// Sets the owning foreign key.
    fn set_owner_id(&mut self, owner_id: Uuid);

    /// Copies every mutable field from `incoming`.
    ///
    /// Must leave the surrogate id and the owning foreign key untouched.
    fn overwrite_from(&mut self, incoming: &Self);
}
