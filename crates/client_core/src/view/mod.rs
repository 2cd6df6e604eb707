//! Views: plain-text renderings of one piece of state each, plus the
//! translation of their own input into intents for presenters.

pub mod edit_form;
pub mod filters;
pub mod format;
pub mod list;
pub mod new_event_button;
pub mod sort;
pub mod trip_event;

pub use edit_form::{EditFormView, FormIntent, FormMode};
pub use filters::FilterView;
pub use list::{MessageView, PlaceholderMessage, TripEventsListView};
pub use new_event_button::NewEventButtonView;
pub use sort::SortView;
pub use trip_event::{RowIntent, TripEventView};
