//! Generic in-memory entity store.
//!
//! One `Store<T>` instance holds the authoritative collection for a single
//! entity family and is the sole mutation surface for it. Ids are assigned
//! with a single policy across all families (`max(existing) + 1`, base 1),
//! records append on create, and `iter` returns insertion order.
//!
//! Mutations are atomic: `update` patches a clone, re-validates, and only
//! then swaps it in, so a failed call leaves the collection untouched.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{StoreError, ValidationError};

/// A record that can live in a [`Store`].
pub trait Record: Clone {
    /// Typed id newtype for this family.
    type Id: Copy + Eq + Into<u32> + From<u32>;

    /// Family name used in errors and logs ("bug", "team", ...).
    const FAMILY: &'static str;

    fn id(&self) -> Self::Id;

    fn set_id(&mut self, raw: u32);

    /// Required-field check applied on create and after every patch.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Stamp creation time. Families without timestamps keep the no-op.
    fn stamp_created(&mut self, _now: DateTime<Utc>) {}

    /// Refresh the modification time. Families without timestamps keep the
    /// no-op.
    fn stamp_updated(&mut self, _now: DateTime<Utc>) {}
}

/// In-memory collection for one entity family.
#[derive(Debug, Clone)]
pub struct Store<T> {
    records: Vec<T>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Record> Store<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Build a store from pre-assigned records (seed data). Ids must already
    /// be set and unique; later `create` calls continue above the maximum.
    #[must_use]
    pub fn with_records(records: Vec<T>) -> Self {
        debug_assert!(
            {
                let mut ids: Vec<u32> = records.iter().map(|r| r.id().into()).collect();
                ids.sort_unstable();
                ids.windows(2).all(|w| w[0] != w[1])
            },
            "seed records for {} must have unique ids",
            T::FAMILY
        );
        Self { records }
    }

    fn next_id(&self) -> u32 {
        self.records
            .iter()
            .map(|r| r.id().into())
            .max()
            .unwrap_or(0)
            + 1
    }

    fn position(&self, raw: u32) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|r| {
                let id: u32 = r.id().into();
                id == raw
            })
            .ok_or(StoreError::NotFound {
                family: T::FAMILY,
                id: raw,
            })
    }

    /// Validate and append a new record, assigning it a fresh id and
    /// stamping its timestamps. Returns a reference to the stored record.
    pub fn create(&mut self, mut record: T) -> Result<&T, StoreError> {
        record.validate()?;
        let raw = self.next_id();
        record.set_id(raw);
        record.stamp_created(Utc::now());
        self.records.push(record);
        debug!(family = T::FAMILY, id = raw, "record created");
        Ok(self
            .records
            .last()
            .expect("collection is non-empty after push"))
    }

    /// Apply `patch` to the record with `id`, re-validate, and swap the
    /// result in. The record's id cannot be changed by the patch.
    pub fn update(
        &mut self,
        id: T::Id,
        patch: impl FnOnce(&mut T),
    ) -> Result<&T, StoreError> {
        let raw: u32 = id.into();
        let pos = self.position(raw)?;
        let mut patched = self.records[pos].clone();
        patch(&mut patched);
        patched.set_id(raw);
        patched.validate()?;
        patched.stamp_updated(Utc::now());
        self.records[pos] = patched;
        debug!(family = T::FAMILY, id = raw, "record updated");
        Ok(&self.records[pos])
    }

    /// Remove and return the record with `id`. Absent ids are an explicit
    /// [`StoreError::NotFound`], never a silent no-op.
    pub fn remove(&mut self, id: T::Id) -> Result<T, StoreError> {
        let raw: u32 = id.into();
        let pos = self.position(raw)?;
        let removed = self.records.remove(pos);
        debug!(family = T::FAMILY, id = raw, "record removed");
        Ok(removed)
    }

    #[must_use]
    pub fn get(&self, id: T::Id) -> Option<&T> {
        let raw: u32 = id.into();
        self.records.iter().find(|r| {
            let id: u32 = r.id().into();
            id == raw
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// The whole collection in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a, T: Record> IntoIterator for &'a Store<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
