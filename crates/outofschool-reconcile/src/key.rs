//! Reconciliation keys.

use std::fmt;

use uuid::Uuid;

use crate::child::OwnedChild;

/// The value used to match an incoming child against an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChildKey {
    /// Matched by surrogate id.
    Surrogate(Uuid),
    /// Matched by a normalized business field.
    Natural(String),
}

/// How a collection derives `ChildKey`s. Fixed per collection; the two
/// variants are never mixed within one reconciliation.
pub enum KeyStrategy<C> {
    /// The caller echoes back ids of children it wants kept or changed and
    /// omits the id (or supplies a fresh one) for children it wants created.
    SurrogateId,
    /// The caller cannot know surrogate ids, so children are matched on the
    /// trimmed value of a business field.
    NaturalKey(fn(&C) -> &str),
}

impl<C: OwnedChild> KeyStrategy<C> {
    /// Extracts the key of `child`.
    ///
    /// Returns `None` for nil ids and blank natural keys; such children
    /// never match anything and are always created.
    pub fn key_of(&self, child: &C) -> Option<ChildKey> {
        match self {
            Self::SurrogateId => child
                .id()
                .filter(|id| !id.is_nil())
                .map(ChildKey::Surrogate),
            Self::NaturalKey(field) => {
                let value = field(child).trim();
                (!value.is_empty()).then(|| ChildKey::Natural(value.to_owned()))
            }
        }
    }

    /// Whether ids supplied on incoming children survive into creates.
    #[must_use]
    pub fn keeps_caller_ids(&self) -> bool {
        matches!(self, Self::SurrogateId)
    }
}

impl<C> Clone for KeyStrategy<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for KeyStrategy<C> {}

impl<C> fmt::Debug for KeyStrategy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurrogateId => f.write_str("SurrogateId"),
            Self::NaturalKey(_) => f.write_str("NaturalKey"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Note, note, note_with_id};

    fn by_title() -> KeyStrategy<Note> {
        KeyStrategy::NaturalKey(Note::title)
    }

    #[test]
    fn test_natural_key_is_trimmed() {
        let child = note("  Main office ");

        assert_eq!(
            by_title().key_of(&child),
            Some(ChildKey::Natural("Main office".to_owned()))
        );
    }

    #[test]
    fn test_blank_natural_key_is_unresolvable() {
        assert_eq!(by_title().key_of(&note("   ")), None);
    }

    #[test]
    fn test_surrogate_key_uses_id() {
        let id = Uuid::new_v4();
        let strategy: KeyStrategy<Note> = KeyStrategy::SurrogateId;

        assert_eq!(
            strategy.key_of(&note_with_id(id, "x")),
            Some(ChildKey::Surrogate(id))
        );
    }

    #[test]
    fn test_missing_or_nil_id_is_unresolvable() {
        let strategy: KeyStrategy<Note> = KeyStrategy::SurrogateId;

        assert_eq!(strategy.key_of(&note("x")), None);
        assert_eq!(strategy.key_of(&note_with_id(Uuid::nil(), "x")), None);
    }
}
