//! Out-of-School Reconcile — owned-collection reconciliation.
//!
//! Given an aggregate that owns child collections and a caller-supplied
//! desired state for those collections, this crate computes the minimal
//! create/update/delete set, enforces the cross-element invariants each
//! collection declares, and hands the result to an `AggregateStore` as a
//! single unit of work.
//!
//! The pipeline for one collection is:
//! de-duplicate by key, enforce invariants, plan the diff, apply the plan.
//! `AggregateReconciler` runs that pipeline for every collection of an
//! aggregate and commits the outcome atomically.

pub mod child;
pub mod collection;
pub mod guard;
pub mod invariants;
pub mod key;
pub mod planner;
pub mod reconciler;

#[cfg(test)]
pub(crate) mod fixtures;
