use shared::domain::{Destination, DestinationId, EventType, Offer, OfferId, OffersByType};

/// Read-only reference data snapshot handed to views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    destinations: Vec<Destination>,
    offers: Vec<OffersByType>,
}

impl Catalog {
    pub fn new(destinations: Vec<Destination>, offers: Vec<OffersByType>) -> Self {
        Self {
            destinations,
            offers,
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|destination| destination.id == id)
    }

    /// Exact, case-sensitive name lookup.
    pub fn destination_by_name(&self, name: &str) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|destination| destination.name == name)
    }

    pub fn offers_for(&self, event_type: EventType) -> &[Offer] {
        self.offers
            .iter()
            .find(|group| group.event_type == event_type)
            .map(|group| group.offers.as_slice())
            .unwrap_or(&[])
    }

    pub fn offer(&self, event_type: EventType, id: OfferId) -> Option<&Offer> {
        self.offers_for(event_type)
            .iter()
            .find(|offer| offer.id == id)
    }

    /// Types offered by the type picker: the ones with an offer group, or
    /// every known type when no offers were loaded.
    pub fn event_types(&self) -> Vec<EventType> {
        if self.offers.is_empty() {
            return EventType::ALL.to_vec();
        }
        self.offers.iter().map(|group| group.event_type).collect()
    }
}
