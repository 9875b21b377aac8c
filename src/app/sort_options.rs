//! Pending sort selection edited in the filter modal.
//!
//! Two checkboxes, at most one of which may be committed. The header badge is
//! derived from the flags rather than counted separately.

use crate::error::ValidationError;
use crate::search::SortKey;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub by_name: bool,
    pub by_email: bool,
}

impl SortOptions {
    /// Flip one option. Nothing is sorted until [`commit`](Self::commit).
    pub fn toggle(&mut self, key: SortKey) {
        match key {
            SortKey::Name => self.by_name = !self.by_name,
            SortKey::Email => self.by_email = !self.by_email,
        }
    }

    pub fn is_active(&self, key: SortKey) -> bool {
        match key {
            SortKey::Name => self.by_name,
            SortKey::Email => self.by_email,
        }
    }

    /// Number of checked options, shown as the filter badge.
    pub fn badge_count(&self) -> usize {
        usize::from(self.by_name) + usize::from(self.by_email)
    }

    /// Validate the selection and return the key to sort by.
    pub fn commit(&self) -> Result<SortKey, ValidationError> {
        match (self.by_name, self.by_email) {
            (true, true) => Err(ValidationError::MultipleSelected),
            (false, false) => Err(ValidationError::NoneSelected),
            (true, false) => Ok(SortKey::Name),
            (false, true) => Ok(SortKey::Email),
        }
    }
}
