//! Child and aggregate types shared by this crate's unit tests.

use chrono::{DateTime, Utc};
use outofschool_core::aggregate::AggregateRoot;
use outofschool_core::error::DomainError;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::ChildWrite;
use uuid::Uuid;

use crate::child::OwnedChild;
use crate::collection::CollectionRules;
use crate::invariants::{InvariantEnforcer, MarkerRule, Requirement};
use crate::key::KeyStrategy;
use crate::reconciler::ReconcilableAggregate;

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: Option<Uuid>,
    pub board_id: Option<Uuid>,
    pub title: String,
    pub body: String,
    pub pinned: bool,
    pub location: Option<String>,
    pub tags: Vec<String>,
}

impl Note {
    pub fn title(&self) -> &str {
        &self.title
    }

    fn is_pinned(&self) -> bool {
        self.pinned
    }

    fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }
}

impl OwnedChild for Note {
    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Option<Uuid>) {
        self.id = id;
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.board_id
    }

    fn set_owner_id(&mut self, owner_id: Uuid) {
        self.board_id = Some(owner_id);
    }

    fn overwrite_from(&mut self, incoming: &Self) {
        self.title.clone_from(&incoming.title);
        self.body.clone_from(&incoming.body);
        self.pinned = incoming.pinned;
        self.location.clone_from(&incoming.location);
        self.tags.clone_from(&incoming.tags);
    }
}

pub fn note(title: &str) -> Note {
    Note {
        id: None,
        board_id: None,
        title: title.to_owned(),
        body: String::new(),
        pinned: false,
        location: Some("hall".to_owned()),
        tags: vec!["general".to_owned()],
    }
}

pub fn note_with_id(id: Uuid, title: &str) -> Note {
    Note {
        id: Some(id),
        ..note(title)
    }
}

pub fn pinned(mut note: Note) -> Note {
    note.pinned = true;
    note
}

pub fn persisted(board_id: Uuid, mut note: Note) -> Note {
    note.board_id = Some(board_id);
    if note.id.is_none() {
        note.id = Some(Uuid::new_v4());
    }
    note
}

/// Natural-key notes with exactly-one-pinned auto-promotion and required
/// location and tags.
pub fn titled_rules() -> CollectionRules<Note> {
    CollectionRules::new(
        "notes",
        KeyStrategy::NaturalKey(Note::title),
        InvariantEnforcer::new()
            .with_marker(MarkerRule::exactly_one_auto_promote(
                Note::is_pinned,
                Note::set_pinned,
                "Only one note can be pinned.",
            ))
            .require(Requirement::present(
                |n: &Note| n.location.is_some(),
                "Location must be specified for each note.",
            ))
            .require(Requirement::non_empty(
                |n: &Note| n.tags.len(),
                "At least one tag must be specified for each note.",
            )),
    )
}

/// Id-keyed notes allowing at most one pinned note.
pub fn id_rules() -> CollectionRules<Note> {
    CollectionRules::new(
        "notes",
        KeyStrategy::SurrogateId,
        InvariantEnforcer::new().with_marker(MarkerRule::at_most_one(
            Note::is_pinned,
            Note::set_pinned,
            "No more than one pinned note can be specified.",
        )),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoardWrite {
    Note(ChildWrite<Note>),
    Archived(ChildWrite<Note>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub id: Uuid,
    pub version: i64,
    pub name: String,
    pub notes: Vec<Note>,
    pub archived: Vec<Note>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Board {
    pub fn new(id: Uuid, name: &str) -> Self {
        Self {
            id,
            version: 0,
            name: name.to_owned(),
            notes: Vec::new(),
            archived: Vec::new(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardChanges {
    pub name: String,
    pub notes: Vec<Note>,
    pub archived: Vec<Note>,
}

impl AggregateRoot for Board {
    type Write = BoardWrite;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

impl ReconcilableAggregate for Board {
    type Desired = BoardChanges;

    fn reconcile(
        &mut self,
        desired: BoardChanges,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<BoardWrite>, DomainError> {
        let notes = titled_rules().reconcile(self.id, &self.notes, desired.notes, ids)?;
        let archived = id_rules().reconcile(self.id, &self.archived, desired.archived, ids)?;

        self.name = desired.name;
        self.notes = notes.children;
        self.archived = archived.children;

        Ok(notes
            .writes
            .into_iter()
            .map(BoardWrite::Note)
            .chain(archived.writes.into_iter().map(BoardWrite::Archived))
            .collect())
    }
}
