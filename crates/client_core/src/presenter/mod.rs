//! Presenters bind models to views. Views report intents, presenters turn
//! them into requests, and the application presenter is the only place that
//! applies requests to the models.

pub mod app;
pub mod error;
pub mod filters;
pub mod new_event;
pub mod sort;
pub mod trip_event;

use shared::domain::{EventId, NewTripEvent, TripEvent, UpdateType};

use crate::edit_token::EditorSlot;

pub use app::{AppPresenter, Regions};
pub use error::PresenterError;
pub use filters::FilterPresenter;
pub use new_event::NewEventPresenter;
pub use sort::SortPresenter;
pub use trip_event::TripEventPresenter;

/// Structural changes routed through the action funnel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Create(NewTripEvent),
    Delete(EventId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterRequest {
    OpenEdit(EventId),
    Update(UpdateType, TripEvent),
    /// Commit an edited event and close its form.
    Submit(TripEvent),
    CloseEdit(EditorSlot),
    Action(UserAction, UpdateType),
}
