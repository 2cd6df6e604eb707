use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use shared::domain::{DestinationId, EventId, EventType, NewTripEvent, OfferId, TripEvent};
use thiserror::Error;

pub const DEFAULT_EVENT_TYPE: EventType = EventType::Taxi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("price must be a whole number")]
    MissingPrice,
    #[error("choose a destination from the list")]
    MissingDestination,
    #[error("end date must not be before start date")]
    DatesOutOfOrder,
    #[error("event has not been saved yet")]
    Unsaved,
}

/// Uncommitted form state. Offers are kept as a set while editing and turned
/// back into an ordered list on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub id: Option<EventId>,
    pub event_type: EventType,
    /// `None` stands for a price field that holds no digits.
    pub base_price: Option<u32>,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: Option<DestinationId>,
    pub offers: BTreeSet<OfferId>,
    pub is_favorite: bool,
}

impl EventDraft {
    pub fn from_event(event: &TripEvent) -> Self {
        Self {
            id: Some(event.id),
            event_type: event.event_type,
            base_price: Some(event.base_price),
            date_from: event.date_from,
            date_to: event.date_to,
            destination: Some(event.destination),
            offers: event.offers.iter().copied().collect(),
            is_favorite: event.is_favorite,
        }
    }

    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            event_type: DEFAULT_EVENT_TYPE,
            base_price: None,
            date_from: now,
            date_to: now,
            destination: None,
            offers: BTreeSet::new(),
            is_favorite: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.checked_fields().map(|_| ())
    }

    pub fn to_event(&self) -> Result<TripEvent, ValidationError> {
        let id = self.id.ok_or(ValidationError::Unsaved)?;
        Ok(self.checked_fields()?.with_id(id))
    }

    pub fn to_new_event(&self) -> Result<NewTripEvent, ValidationError> {
        self.checked_fields()
    }

    fn checked_fields(&self) -> Result<NewTripEvent, ValidationError> {
        let base_price = self.base_price.ok_or(ValidationError::MissingPrice)?;
        let destination = self.destination.ok_or(ValidationError::MissingDestination)?;
        if self.date_to < self.date_from {
            return Err(ValidationError::DatesOutOfOrder);
        }
        Ok(NewTripEvent {
            event_type: self.event_type,
            base_price,
            date_from: self.date_from,
            date_to: self.date_to,
            destination,
            offers: self.offers.iter().copied().collect(),
            is_favorite: self.is_favorite,
        })
    }
}
