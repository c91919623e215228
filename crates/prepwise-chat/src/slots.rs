//! Per-session slot values collected by follow-up forms.

use prepwise_core::{Address, Household};
use tracing::debug;

use crate::error::ChatError;

/// Household and address captured so far in a session.
///
/// Values persist until overwritten by a later submission or cleared by
/// [`SlotTracker::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTracker {
    household: Option<Household>,
    address: Option<Address>,
}

impl SlotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn household(&self) -> Option<&Household> {
        self.household.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Store a household, replacing any earlier one.
    ///
    /// Fails with `InvalidSlotValue` if any count exceeds
    /// [`Household::MAX_PER_FIELD`]; the tracker is left unchanged.
    pub fn set_household(&mut self, household: Household) -> Result<(), ChatError> {
        if let Some((field, value)) = household.out_of_range_field() {
            return Err(ChatError::InvalidSlotValue {
                field,
                value,
                max: Household::MAX_PER_FIELD,
            });
        }
        debug!(%household, "Household slot set");
        self.household = Some(household);
        Ok(())
    }

    pub fn set_address(&mut self, address: Address) {
        debug!(%address, "Address slot set");
        self.address = Some(address);
    }

    pub fn reset(&mut self) {
        self.household = None;
        self.address = None;
    }
}
