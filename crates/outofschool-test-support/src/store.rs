//! Test stores — mock `AggregateStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use outofschool_core::aggregate::AggregateRoot;
use outofschool_core::error::DomainError;
use outofschool_core::repository::{AggregateStore, UnitOfWork};
use uuid::Uuid;

/// An aggregate store backed by a `HashMap`. Commits are atomic and guarded
/// by version exactly like the Postgres store, and every successful insert
/// or commit is recorded.
#[derive(Debug)]
pub struct InMemoryAggregateStore<A: AggregateRoot> {
    aggregates: Mutex<HashMap<Uuid, A>>,
    committed: Mutex<Vec<UnitOfWork<A>>>,
}

impl<A: AggregateRoot> InMemoryAggregateStore<A> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            aggregates: Mutex::new(HashMap::new()),
            committed: Mutex::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with `aggregates`. Seeding is not
    /// recorded as a commit.
    #[must_use]
    pub fn with_aggregates(aggregates: impl IntoIterator<Item = A>) -> Self {
        let store = Self::new();
        store.aggregates.lock().unwrap().extend(
            aggregates
                .into_iter()
                .map(|aggregate| (aggregate.aggregate_id(), aggregate)),
        );
        store
    }

    /// Returns the stored state of an aggregate.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn get(&self, aggregate_id: Uuid) -> Option<A> {
        self.aggregates.lock().unwrap().get(&aggregate_id).cloned()
    }

    /// Removes an aggregate, simulating a concurrent delete.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn remove(&self, aggregate_id: Uuid) -> Option<A> {
        self.aggregates.lock().unwrap().remove(&aggregate_id)
    }

    /// Returns a snapshot of every unit of work that was inserted or
    /// committed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn committed_units(&self) -> Vec<UnitOfWork<A>> {
        self.committed.lock().unwrap().clone()
    }
}

impl<A: AggregateRoot> Default for InMemoryAggregateStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: AggregateRoot + 'static> AggregateStore<A> for InMemoryAggregateStore<A> {
    async fn load_with_children(&self, aggregate_id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(self.get(aggregate_id))
    }

    async fn insert(&self, unit: &UnitOfWork<A>) -> Result<(), DomainError> {
        let mut aggregates = self.aggregates.lock().unwrap();
        let aggregate_id = unit.aggregate_id();
        if aggregates.contains_key(&aggregate_id) {
            return Err(DomainError::Infrastructure(format!(
                "duplicate key: aggregate {aggregate_id} already exists"
            )));
        }
        aggregates.insert(aggregate_id, unit.aggregate.clone());
        self.committed.lock().unwrap().push(unit.clone());
        Ok(())
    }

    async fn commit(&self, unit: &UnitOfWork<A>) -> Result<(), DomainError> {
        let mut aggregates = self.aggregates.lock().unwrap();
        let aggregate_id = unit.aggregate_id();
        let current = aggregates.get(&aggregate_id).map(AggregateRoot::version);
        if current != Some(unit.expected_version) {
            return Err(DomainError::conflict(
                aggregate_id,
                unit.expected_version,
                current,
            ));
        }
        aggregates.insert(aggregate_id, unit.aggregate.clone());
        self.committed.lock().unwrap().push(unit.clone());
        Ok(())
    }
}

/// A store that loads a fixed snapshot but reports the aggregate as deleted
/// when the commit arrives. Useful for testing the load-to-commit race.
#[derive(Debug)]
pub struct VanishingAggregateStore<A> {
    snapshot: A,
}

impl<A> VanishingAggregateStore<A> {
    /// Create a store that serves `snapshot` from every load.
    #[must_use]
    pub fn new(snapshot: A) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl<A: AggregateRoot + 'static> AggregateStore<A> for VanishingAggregateStore<A> {
    async fn load_with_children(&self, _aggregate_id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(Some(self.snapshot.clone()))
    }

    async fn insert(&self, _unit: &UnitOfWork<A>) -> Result<(), DomainError> {
        Ok(())
    }

    async fn commit(&self, unit: &UnitOfWork<A>) -> Result<(), DomainError> {
        Err(DomainError::conflict(
            unit.aggregate_id(),
            unit.expected_version,
            None,
        ))
    }
}

/// A store that loads a fixed snapshot but fails every write with an
/// infrastructure error, as if the transaction was rolled back.
#[derive(Debug)]
pub struct UnavailableCommitStore<A> {
    snapshot: A,
}

impl<A> UnavailableCommitStore<A> {
    /// Create a store that serves `snapshot` from every load.
    #[must_use]
    pub fn new(snapshot: A) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl<A: AggregateRoot + 'static> AggregateStore<A> for UnavailableCommitStore<A> {
    async fn load_with_children(&self, _aggregate_id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(Some(self.snapshot.clone()))
    }

    async fn insert(&self, _unit: &UnitOfWork<A>) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("transaction rolled back".into()))
    }

    async fn commit(&self, _unit: &UnitOfWork<A>) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("transaction rolled back".into()))
    }
}

/// An aggregate store that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingAggregateStore;

#[async_trait]
impl<A: AggregateRoot + 'static> AggregateStore<A> for FailingAggregateStore {
    async fn load_with_children(&self, _aggregate_id: Uuid) -> Result<Option<A>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn insert(&self, _unit: &UnitOfWork<A>) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn commit(&self, _unit: &UnitOfWork<A>) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
