use serde::{Deserialize, Serialize};

use crate::domain::{Destination, OffersByType, TripEvent};

/// Raw itinerary data as delivered by the loading collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItineraryBundle {
    #[serde(default)]
    pub events: Vec<TripEvent>,
    #[serde(default)]
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub offers: Vec<OffersByType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventType, OfferId};

    #[test]
    fn missing_sections_decode_as_empty() {
        let bundle: ItineraryBundle =
            serde_json::from_str(r#"{"offers":[{"type":"bus","offers":[{"id":1,"title":"Wi-Fi","price":3}]}]}"#)
                .expect("decode bundle");

        assert!(bundle.events.is_empty());
        assert!(bundle.destinations.is_empty());
        assert_eq!(bundle.offers[0].event_type, EventType::Bus);
        assert_eq!(bundle.offers[0].offers[0].id, OfferId(1));
    }
}
