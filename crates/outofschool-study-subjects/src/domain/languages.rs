//! Languages a study subject is taught in.
//!
//! A subject language is a link row keyed by the language's id, so the
//! same language can never appear twice on one subject.

use outofschool_reconcile::child::OwnedChild;
use outofschool_reconcile::collection::CollectionRules;
use outofschool_reconcile::invariants::{InvariantEnforcer, MarkerRule, Requirement};
use outofschool_reconcile::key::KeyStrategy;
use uuid::Uuid;

/// Rejection message when more than one language is marked primary.
pub const MULTIPLE_PRIMARY_LANGUAGES: &str = "Only one primary language can be specified.";

/// Rejection message when languages are given but none is primary.
pub const PRIMARY_LANGUAGE_REQUIRED: &str = "Exactly one primary language must be specified.";

/// Rejection message when a link does not name a language.
pub const LANGUAGE_REQUIRED: &str = "Language must be specified for each study subject language.";

/// A language a subject is taught in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectLanguage {
    /// The language's id, which doubles as the link's key.
    pub language_id: Option<Uuid>,
    /// The owning study subject.
    pub study_subject_id: Option<Uuid>,
    /// Whether the subject is primarily taught in this language.
    pub is_primary: bool,
}

impl SubjectLanguage {
    /// A link to an existing language.
    #[must_use]
    pub fn new(language_id: Uuid, is_primary: bool) -> Self {
        Self {
            language_id: Some(language_id),
            study_subject_id: None,
            is_primary,
        }
    }

    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, is_primary: bool) {
        self.is_primary = is_primary;
    }

    fn names_language(&self) -> bool {
        self.language_id.is_some_and(|id| !id.is_nil())
    }
}

impl OwnedChild for SubjectLanguage {
    fn id(&self) -> Option<Uuid> {
        self.language_id
    }

    fn set_id(&mut self, id: Option<Uuid>) {
        self.language_id = id;
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.study_subject_id
    }

    fn set_owner_id(&mut self, owner_id: Uuid) {
        self.study_subject_id = Some(owner_id);
    }

    fn overwrite_from(&mut self, incoming: &Self) {
        self.is_primary = incoming.is_primary;
    }
}

/// Reconciliation rules for subject languages.
///
/// The key is a reference to an existing language, so every link must name
/// one; a link without it would otherwise be given a freshly minted id.
#[must_use]
pub fn language_rules() -> CollectionRules<SubjectLanguage> {
    CollectionRules::new(
        "languages",
        KeyStrategy::SurrogateId,
        InvariantEnforcer::new()
            .with_marker(MarkerRule::exactly_one_required(
                SubjectLanguage::is_primary,
                SubjectLanguage::set_primary,
                MULTIPLE_PRIMARY_LANGUAGES,
                PRIMARY_LANGUAGE_REQUIRED,
            ))
            .require(Requirement::present(
                SubjectLanguage::names_language,
                LANGUAGE_REQUIRED,
            )),
    )
}
