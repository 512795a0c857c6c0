//! Repeating sections and the list mutation protocol.
//!
//! Every repeating section of a case (attached lines, infusions, antibiotics, high-alert
//! medications, cultures) is stored as a [`Rows`] sequence and mutated through the same three
//! operations:
//!
//! - **update**: replace one field of the row at an index; all other rows and fields are
//!   untouched.
//! - **push**: append a zero-value row at the end, preserving the order of existing rows.
//! - **remove**: stable removal of the row at an index, but only while more than one row
//!   remains. The last row can be cleared but never removed.
//!
//! Indices are caller-guaranteed. An out-of-range index is a programming error and panics.
//!
//! ## Invariant
//!
//! A `Rows<R>` always holds at least one row. This is enforced by construction
//! ([`Default`] seeds one zero-value row), by [`Rows::remove`], and on deserialisation
//! (an empty stored list is re-seeded with one zero-value row).

use serde::{Deserialize, Serialize};

/// A uniformly-shaped row within a repeating section.
///
/// Each row type names its editable fields with a small `Copy` enum, so a field identifier can
/// only ever be applied to the row shape it belongs to.
pub trait SectionRow: Default + Clone {
    /// Field identifiers for this row shape.
    type Field: Copy + std::fmt::Debug;

    /// Mutable access to the text slot behind `field`.
    fn field_mut(&mut self, field: Self::Field) -> &mut String;

    /// Read access to the text slot behind `field`.
    fn field(&self, field: Self::Field) -> &str;
}

/// An ordered, never-empty sequence of section rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Rows<R>(Vec<R>);

impl<R: Default> Default for Rows<R> {
    fn default() -> Self {
        Self(vec![R::default()])
    }
}

impl<R> Rows<R> {
    /// Number of rows; always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.0.iter()
    }

    /// Appends `row` after the existing rows.
    pub fn push(&mut self, row: R) {
        self.0.push(row);
    }

    /// Removes the row at `index`, preserving the relative order of the remaining rows.
    ///
    /// Returns `false` without touching the sequence when only one row remains.
    ///
    /// # Panics
    ///
    /// Panics if more than one row remains and `index` is out of range.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.0.len() <= 1 {
            return false;
        }
        assert!(
            index < self.0.len(),
            "row index {} out of range for section of {} rows",
            index,
            self.0.len()
        );
        self.0.remove(index);
        true
    }
}

impl<R: SectionRow> Rows<R> {
    /// Appends one zero-value row.
    pub fn push_empty(&mut self) {
        self.push(R::default());
    }

    /// Replaces `field` of the row at `index` with `value`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_field(&mut self, index: usize, field: R::Field, value: String) {
        let len = self.0.len();
        let row = self.0.get_mut(index).unwrap_or_else(|| {
            panic!(
                "row index {} out of range for section of {} rows",
                index, len
            )
        });
        *row.field_mut(field) = value;
    }
}

impl<'a, R> IntoIterator for &'a Rows<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de, R> Deserialize<'de> for Rows<R>
where
    R: Deserialize<'de> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut rows = Vec::<R>::deserialize(deserializer)?;
        if rows.is_empty() {
            rows.push(R::default());
        }
        Ok(Self(rows))
    }
}
