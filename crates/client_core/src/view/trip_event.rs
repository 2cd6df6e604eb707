use shared::domain::{EventId, Offer, TripEvent};

use crate::{
    catalog::Catalog,
    input::RowInput,
    render::{NodeId, View},
    view::format::{capitalize, format_day, format_duration, format_time},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIntent {
    OpenEdit,
    ToggleFavorite,
}

/// Read-only row for one trip event.
pub struct TripEventView {
    event: TripEvent,
    destination_name: String,
    offers: Vec<Offer>,
    element: Option<NodeId>,
}

impl TripEventView {
    pub fn new(event: &TripEvent, catalog: &Catalog) -> Self {
        let destination_name = catalog
            .destination(event.destination)
            .map(|destination| destination.name.clone())
            .unwrap_or_default();
        let offers = catalog
            .offers_for(event.event_type)
            .iter()
            .filter(|offer| event.offers.contains(&offer.id))
            .cloned()
            .collect();

        Self {
            event: event.clone(),
            destination_name,
            offers,
            element: None,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event.id
    }

    pub fn handle_input(&self, input: RowInput) -> RowIntent {
        match input {
            RowInput::RollupClick => RowIntent::OpenEdit,
            RowInput::FavoriteClick => RowIntent::ToggleFavorite,
        }
    }
}

impl View for TripEventView {
    fn template(&self) -> String {
        let event = &self.event;
        let offers = if self.offers.is_empty() {
            String::new()
        } else {
            let items: Vec<String> = self
                .offers
                .iter()
                .map(|offer| format!("+ {} €{}", offer.title, offer.price))
                .collect();
            format!(" | {}", items.join(", "))
        };
        let favorite = if event.is_favorite { "★" } else { "☆" };

        format!(
            "#{id} {day} | {kind} {destination} | {from} - {to} ({duration}) | €{price}{offers} | {favorite}",
            id = event.id,
            day = format_day(event.date_from),
            kind = capitalize(event.event_type.as_str()),
            destination = self.destination_name,
            from = format_time(event.date_from),
            to = format_time(event.date_to),
            duration = format_duration(event.duration()),
            price = event.base_price,
        )
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element(&mut self, element: Option<NodeId>) {
        self.element = element;
    }
}
