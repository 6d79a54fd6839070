//! Cross-element invariants over a desired collection.
//!
//! Checks run over the de-duplicated incoming set before any diffing, so a
//! rejected collection never produces a single write.

use std::fmt;

use outofschool_core::error::DomainError;

/// How many children may carry the marker flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPolicy {
    /// Exactly one; when none is marked the first child is promoted.
    ExactlyOneAutoPromote,
    /// Exactly one; a non-empty collection without a marked child is rejected.
    ExactlyOneRequired,
    /// Zero or one; nothing is promoted.
    AtMostOne,
}

/// A boolean field subject to a collection-wide uniqueness invariant, such as
/// "default contact" or "chief judge".
pub struct MarkerRule<C> {
    is_marked: fn(&C) -> bool,
    set_marked: fn(&mut C, bool),
    policy: MarkerPolicy,
    too_many: &'static str,
    missing: &'static str,
}

impl<C> MarkerRule<C> {
    /// Exactly one marked child, promoting the first in input order when the
    /// caller marked none.
    pub fn exactly_one_auto_promote(
        is_marked: fn(&C) -> bool,
        set_marked: fn(&mut C, bool),
        too_many: &'static str,
    ) -> Self {
        Self {
            is_marked,
            set_marked,
            policy: MarkerPolicy::ExactlyOneAutoPromote,
            too_many,
            missing: "",
        }
    }

    /// Exactly one marked child, rejecting the collection when none is marked.
    pub fn exactly_one_required(
        is_marked: fn(&C) -> bool,
        set_marked: fn(&mut C, bool),
        too_many: &'static str,
        missing: &'static str,
    ) -> Self {
        Self {
            is_marked,
            set_marked,
            policy: MarkerPolicy::ExactlyOneRequired,
            too_many,
            missing,
        }
    }

    /// At most one marked child.
    pub fn at_most_one(
        is_marked: fn(&C) -> bool,
        set_marked: fn(&mut C, bool),
        too_many: &'static str,
    ) -> Self {
        Self {
            is_marked,
            set_marked,
            policy: MarkerPolicy::AtMostOne,
            too_many,
            missing: "",
        }
    }

    /// Returns the active policy.
    #[must_use]
    pub fn policy(&self) -> MarkerPolicy {
        self.policy
    }

    fn enforce(&self, incoming: &mut [C]) -> Result<(), DomainError> {
        let marked = incoming.iter().filter(|child| (self.is_marked)(*child)).count();
        if marked > 1 {
            return Err(DomainError::Validation(self.too_many.to_owned()));
        }
        if marked == 1 {
            return Ok(());
        }

        match self.policy {
            MarkerPolicy::ExactlyOneAutoPromote => {
                if let Some((first, rest)) = incoming.split_first_mut() {
                    (self.set_marked)(first, true);
                    for child in rest {
                        (self.set_marked)(child, false);
                    }
                }
                Ok(())
            }
            MarkerPolicy::ExactlyOneRequired if !incoming.is_empty() => {
                Err(DomainError::Validation(self.missing.to_owned()))
            }
            MarkerPolicy::ExactlyOneRequired | MarkerPolicy::AtMostOne => Ok(()),
        }
    }
}

impl<C> fmt::Debug for MarkerRule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerRule")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// A nested object every child must carry.
pub enum Requirement<C> {
    /// An optional nested object must be populated.
    Present {
        /// Whether the object is present on a child.
        is_present: fn(&C) -> bool,
        /// User-facing rejection message.
        message: &'static str,
    },
    /// A nested list must contain at least one element.
    NonEmpty {
        /// Length of the list on a child.
        len: fn(&C) -> usize,
        /// User-facing rejection message.
        message: &'static str,
    },
}

impl<C> Requirement<C> {
    /// Requires an optional nested object.
    pub fn present(is_present: fn(&C) -> bool, message: &'static str) -> Self {
        Self::Present {
            is_present,
            message,
        }
    }

    /// Requires a non-empty nested list.
    pub fn non_empty(len: fn(&C) -> usize, message: &'static str) -> Self {
        Self::NonEmpty { len, message }
    }

    fn check(&self, child: &C) -> Result<(), DomainError> {
        let (satisfied, message) = match self {
            Self::Present {
                is_present,
                message,
            } => (is_present(child), message),
            Self::NonEmpty { len, message } => (len(child) > 0, message),
        };
        if satisfied {
            Ok(())
        } else {
            Err(DomainError::Validation((*message).to_owned()))
        }
    }
}

/// Validates one collection's marker and required-field invariants.
pub struct InvariantEnforcer<C> {
    marker: Option<MarkerRule<C>>,
    requirements: Vec<Requirement<C>>,
}

impl<C> InvariantEnforcer<C> {
    /// An enforcer with no invariants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: None,
            requirements: Vec::new(),
        }
    }

    /// Adds the collection's marker rule.
    #[must_use]
    pub fn with_marker(mut self, rule: MarkerRule<C>) -> Self {
        self.marker = Some(rule);
        self
    }

    /// Adds a required nested object.
    #[must_use]
    pub fn require(mut self, requirement: Requirement<C>) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Checks every child against the required-field rules, then applies
    /// the marker policy. The marker may be promoted in place.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` with the rule's message on the first
    /// violation found.
    pub fn enforce(&self, incoming: &mut [C]) -> Result<(), DomainError> {
        for child in incoming.iter() {
            for requirement in &self.requirements {
                requirement.check(child)?;
            }
        }
        match &self.marker {
            Some(rule) => rule.enforce(incoming),
            None => Ok(()),
        }
    }
}

impl<C> Default for InvariantEnforcer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for InvariantEnforcer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvariantEnforcer")
            .field("marker", &self.marker)
            .field("requirements", &self.requirements.len())
            .finish()
    }
}
