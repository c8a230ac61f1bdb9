//! Change classification against the last-checked watermark.
//!
//! Splits a snapshot of course entities into those created since the last
//! check and those merely modified since then. Creation wins: an entity
//! created after the cutoff is "new" even if it was edited again afterwards.

use chrono::{DateTime, Utc};

use crate::models::Timestamped;

/// Entities that changed since the watermark, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a, T> {
    /// Created after the watermark
    pub new: Vec<&'a T>,
    /// Created before, modified after the watermark
    pub updated: Vec<&'a T>,
}

impl<T> Default for Classification<'_, T> {
    fn default() -> Self {
        Self {
            new: Vec::new(),
            updated: Vec::new(),
        }
    }
}

impl<T> Classification<'_, T> {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.new.is_empty() || !self.updated.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.new.len() + self.updated.len()
    }
}

/// Classify entities relative to `last_check`.
///
/// Accepts plain references or `Option<&T>`; `None` entries are skipped.
/// Entities untouched since `last_check` appear in neither list.
pub fn classify<'a, T, I>(entities: I, last_check: DateTime<Utc>) -> Classification<'a, T>
where
    T: Timestamped + 'a,
    I: IntoIterator,
    I::Item: Into<Option<&'a T>>,
{
    classify_window(entities, last_check, DateTime::<Utc>::MAX_UTC)
}

/// Classify changes inside the window `(last_check, until]`.
///
/// Creations and modifications stamped after `until` are left out; the
/// next window, starting at `until`, picks them up.
pub fn classify_window<'a, T, I>(
    entities: I,
    last_check: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Classification<'a, T>
where
    T: Timestamped + 'a,
    I: IntoIterator,
    I::Item: Into<Option<&'a T>>,
{
    let mut result = Classification::default();

    for entity in entities.into_iter().filter_map(Into::into) {
        let created_at = entity.created_at();
        if created_at > until {
            continue;
        }

        if created_at > last_check {
            result.new.push(entity);
        } else if entity.updated_at() > last_check && entity.updated_at() <= until {
            result.updated.push(entity);
        }
    }

    result
}
