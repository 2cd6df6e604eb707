//! User input reaching the surface, already translated from raw widget
//! events into what the user did.

use chrono::{DateTime, Utc};
use shared::domain::{EventId, EventType, FilterType, OfferId, SortType};

use crate::edit_token::EditorSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
}

impl Key {
    pub fn is_dismissal(&self) -> bool {
        matches!(self, Key::Escape)
    }
}

/// Clicks on a read-only event row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowInput {
    RollupClick,
    FavoriteClick,
}

/// Changes and clicks inside an edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    EventType(EventType),
    Destination(String),
    Price(String),
    ToggleOffer(OfferId),
    DateFrom(DateTime<Utc>),
    DateTo(DateTime<Utc>),
    Submit,
    Rollup,
    /// The secondary button: delete in edit mode, cancel in create mode.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    NewEventClick,
    Row { id: EventId, input: RowInput },
    Form { slot: EditorSlot, input: FormInput },
    Filter(FilterType),
    Sort(SortType),
    KeyDown(Key),
}
