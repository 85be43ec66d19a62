//! Pure attribute-set diffing
//!
//! Partitions a collection's current and desired attribute sets into
//! removed / added / changed by name. The result is plain data: applying
//! the implied DDL and metadata mutations is the lifecycle manager's job,
//! which keeps this algorithm testable in isolation.
//!
//! A retained attribute counts as changed only when its `indexed` flag or
//! its `data_type` differs; both require an index rebuild and share one
//! codepath downstream. Config-only differences are not a change.

use tessera_core::Attribute;

/// A retained attribute whose index must be rebuilt
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    /// The attribute as currently persisted
    pub current: Attribute,
    /// The requested attribute state
    pub desired: Attribute,
}

/// Partition of desired vs current attribute sets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeDiff {
    /// Present now, absent in the desired set
    pub removed: Vec<Attribute>,
    /// Absent now, present in the desired set
    pub added: Vec<Attribute>,
    /// Present in both with a differing `indexed` flag or `data_type`
    pub changed: Vec<AttributeChange>,
}

impl AttributeDiff {
    /// True when the update implies no structural work
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }
}

/// Compute the removed/added/changed partition between two attribute sets
///
/// Duplicate names collapse before diffing: the current set keeps the first
/// occurrence, the desired set keeps the last (the desired set expresses
/// intent, so a later entry overrides an earlier one).
pub fn diff_attributes(current: &[Attribute], desired: &[Attribute]) -> AttributeDiff {
    let current_set = dedup_keep_first(current);
    let desired_set = dedup_keep_last(desired);

    let mut diff = AttributeDiff::default();

    for attr in &current_set {
        match desired_set.iter().find(|d| d.name == attr.name) {
            None => diff.removed.push((*attr).clone()),
            Some(desired) => {
                if attr.indexed != desired.indexed || attr.data_type != desired.data_type {
                    diff.changed.push(AttributeChange {
                        current: (*attr).clone(),
                        desired: (*desired).clone(),
                    });
                }
            }
        }
    }

    for attr in &desired_set {
        if !current_set.iter().any(|c| c.name == attr.name) {
            diff.added.push((*attr).clone());
        }
    }

    diff
}

fn dedup_keep_first(attrs: &[Attribute]) -> Vec<&Attribute> {
    let mut out: Vec<&Attribute> = Vec::with_capacity(attrs.len());
    for attr in attrs {
        if !out.iter().any(|a| a.name == attr.name) {
            out.push(attr);
        }
    }
    out
}

fn dedup_keep_last(attrs: &[Attribute]) -> Vec<&Attribute> {
    let mut out: Vec<&Attribute> = Vec::with_capacity(attrs.len());
    for attr in attrs {
        if let Some(slot) = out.iter_mut().find(|a| a.name == attr.name) {
            *slot = attr;
        } else {
            out.push(attr);
        }
    }
    out
}
