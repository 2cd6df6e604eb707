use shared::domain::FilterType;

use crate::render::{NodeId, View};

/// Container every event row and the create form are mounted into.
#[derive(Default)]
pub struct TripEventsListView {
    element: Option<NodeId>,
}

impl TripEventsListView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl View for TripEventsListView {
    fn template(&self) -> String {
        "trip events".to_string()
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element(&mut self, element: Option<NodeId>) {
        self.element = element;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderMessage {
    Loading,
    Empty(FilterType),
}

impl PlaceholderMessage {
    pub fn text(&self) -> &'static str {
        match self {
            PlaceholderMessage::Loading => "Loading...",
            PlaceholderMessage::Empty(FilterType::Everything) => {
                "Click New Event to create your first point"
            }
            PlaceholderMessage::Empty(FilterType::Future) => "There are no future events now",
            PlaceholderMessage::Empty(FilterType::Present) => "There are no present events now",
            PlaceholderMessage::Empty(FilterType::Past) => "There are no past events now",
        }
    }
}

/// Loading or empty-state placeholder shown in place of the list content.
pub struct MessageView {
    message: PlaceholderMessage,
    element: Option<NodeId>,
}

impl MessageView {
    pub fn new(message: PlaceholderMessage) -> Self {
        Self {
            message,
            element: None,
        }
    }

    pub fn message(&self) -> PlaceholderMessage {
        self.message
    }
}

impl View for MessageView {
    fn template(&self) -> String {
        self.message.text().to_string()
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element(&mut self, element: Option<NodeId>) {
        self.element = element;
    }
}
