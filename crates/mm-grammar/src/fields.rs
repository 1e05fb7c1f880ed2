//! The result of a successful pattern match.

use mm_core::{Field, FieldValue};
use rustc_hash::FxHashMap;

/// Field values captured by one pattern match.
///
/// Every group the pattern declares has an entry. Groups that did not
/// participate in the match, or captured only whitespace, hold
/// [`FieldValue::Unknown`]. Fields the pattern does not declare have no
/// entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    values: FxHashMap<Field, FieldValue>,
}

impl FieldMap {
    pub(crate) fn insert(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    /// Returns the value for `field`, or `None` when the pattern does not
    /// declare it.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Returns `true` when the pattern declares `field`.
    #[must_use]
    pub fn declares(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Removes and returns the value for `field`, defaulting to `Unknown`.
    pub fn take(&mut self, field: Field) -> FieldValue {
        self.values.remove(&field).unwrap_or_default()
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over declared fields and their values.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}
