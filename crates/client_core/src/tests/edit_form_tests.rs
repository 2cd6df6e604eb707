use super::*;
use crate::render::{mount, RenderPosition};
use shared::domain::{Destination, DestinationId, EventType, Offer, OfferId, OffersByType};

fn at(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("timestamp")
}

fn offer(id: i64, title: &str, price: u32) -> Offer {
    Offer {
        id: OfferId(id),
        title: title.to_string(),
        price,
    }
}

fn catalog() -> Rc<Catalog> {
    Rc::new(Catalog::new(
        vec![
            Destination {
                id: DestinationId(1),
                name: "Amsterdam".to_string(),
                description: "Canals".to_string(),
                pictures: Vec::new(),
            },
            Destination {
                id: DestinationId(2),
                name: "Geneva".to_string(),
                description: "Lake".to_string(),
                pictures: Vec::new(),
            },
        ],
        vec![
            OffersByType {
                event_type: EventType::Taxi,
                offers: vec![offer(1, "Upgrade", 40), offer(2, "Radio", 5)],
            },
            OffersByType {
                event_type: EventType::Bus,
                offers: vec![offer(1, "Infotainment", 10), offer(2, "Meal", 15)],
            },
        ],
    ))
}

fn event() -> TripEvent {
    TripEvent {
        id: EventId(7),
        event_type: EventType::Taxi,
        base_price: 20,
        date_from: at("2024-01-02T10:00:00Z"),
        date_to: at("2024-01-02T11:00:00Z"),
        destination: DestinationId(1),
        offers: vec![OfferId(1), OfferId(2)],
        is_favorite: false,
    }
}

fn mounted(view: &mut EditFormView) -> Document {
    let mut doc = Document::new();
    let region = doc.create_region("list");
    mount(&mut doc, view, region, RenderPosition::BeforeEnd).expect("mount");
    doc
}

#[test]
fn changing_type_clears_offers_even_when_ids_coincide() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    let intent = form
        .handle_input(&mut doc, FormInput::EventType(EventType::Bus))
        .expect("input");

    assert_eq!(intent, None);
    assert_eq!(form.draft().event_type, EventType::Bus);
    assert!(form.draft().offers.is_empty());
    assert!(doc.render_text().contains("[ ] Infotainment"));
}

#[test]
fn unknown_destination_reverts_input_without_touching_draft() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    form.handle_input(&mut doc, FormInput::Destination("Atlantis".to_string()))
        .expect("input");
    assert_eq!(form.draft().destination, Some(DestinationId(1)));
    assert_eq!(form.destination_text(), "Amsterdam");

    form.handle_input(&mut doc, FormInput::Destination("Geneva".to_string()))
        .expect("input");
    assert_eq!(form.draft().destination, Some(DestinationId(2)));
    assert!(doc.render_text().contains("about Geneva: Lake"));
}

#[test]
fn price_input_keeps_digits_only() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    form.handle_input(&mut doc, FormInput::Price("1a2-3".to_string()))
        .expect("input");
    assert_eq!(form.draft().base_price, Some(123));
    assert_eq!(form.price_text(), "123");

    form.handle_input(&mut doc, FormInput::Price("abc".to_string()))
        .expect("input");
    assert_eq!(form.draft().base_price, None);
    assert_eq!(form.price_text(), "");
}

#[test]
fn empty_price_is_rejected_on_submit_and_stays_in_the_form() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    form.handle_input(&mut doc, FormInput::Price(String::new()))
        .expect("input");
    let intent = form.handle_input(&mut doc, FormInput::Submit).expect("submit");

    assert_eq!(intent, None);
    assert_eq!(form.error(), Some(ValidationError::MissingPrice));
    assert!(doc.render_text().contains("error: price must be a whole number"));
}

#[test]
fn offers_toggle_within_the_current_type_only() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    form.handle_input(&mut doc, FormInput::ToggleOffer(OfferId(2)))
        .expect("input");
    assert_eq!(form.draft().offers.iter().copied().collect::<Vec<_>>(), vec![OfferId(1)]);

    form.handle_input(&mut doc, FormInput::ToggleOffer(OfferId(99)))
        .expect("input");
    assert_eq!(form.draft().offers.len(), 1);

    form.handle_input(&mut doc, FormInput::ToggleOffer(OfferId(2)))
        .expect("input");
    assert_eq!(form.draft().offers.len(), 2);
}

#[test]
fn date_pickers_update_only_their_own_field() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);
    let original_to = form.draft().date_to;

    let new_from = at("2024-01-02T09:00:00Z");
    form.handle_input(&mut doc, FormInput::DateFrom(new_from))
        .expect("input");

    assert_eq!(form.draft().date_from, new_from);
    assert_eq!(form.draft().date_to, original_to);
    let (from_input, to_input) = form.date_inputs();
    assert_eq!(doc.date_input_value(from_input.expect("bound")), Some(new_from));
    assert_eq!(doc.date_input_value(to_input.expect("bound")), Some(original_to));
    assert_eq!(doc.live_date_inputs(), 2);
}

#[test]
fn end_before_start_is_rejected() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    form.handle_input(&mut doc, FormInput::DateTo(at("2024-01-01T00:00:00Z")))
        .expect("input");
    let intent = form.handle_input(&mut doc, FormInput::Submit).expect("submit");

    assert_eq!(intent, None);
    assert_eq!(form.error(), Some(ValidationError::DatesOutOfOrder));
}

#[test]
fn submit_returns_the_full_edited_event() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    form.handle_input(&mut doc, FormInput::Price("35".to_string()))
        .expect("input");
    let intent = form.handle_input(&mut doc, FormInput::Submit).expect("submit");

    let expected = TripEvent {
        base_price: 35,
        ..event()
    };
    assert_eq!(intent, Some(FormIntent::Save(expected)));
}

#[test]
fn secondary_button_deletes_in_edit_mode_and_cancels_in_create_mode() {
    let mut edit = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut edit);
    assert_eq!(
        edit.handle_input(&mut doc, FormInput::Reset).expect("reset"),
        Some(FormIntent::Delete(EventId(7)))
    );

    let mut create = EditFormView::for_create(catalog(), at("2024-01-01T00:00:00Z"));
    let mut doc = mounted(&mut create);
    assert_eq!(
        create.handle_input(&mut doc, FormInput::Reset).expect("reset"),
        Some(FormIntent::Cancel)
    );
    assert_eq!(
        create.handle_input(&mut doc, FormInput::Rollup).expect("rollup"),
        None
    );
}

#[test]
fn create_form_submits_a_new_event_once_complete() {
    let now = at("2024-01-01T00:00:00Z");
    let mut form = EditFormView::for_create(catalog(), now);
    let mut doc = mounted(&mut form);
    assert_eq!(form.draft().event_type, EventType::Taxi);

    form.handle_input(&mut doc, FormInput::Destination("Geneva".to_string()))
        .expect("input");
    form.handle_input(&mut doc, FormInput::Price("12".to_string()))
        .expect("input");
    let intent = form.handle_input(&mut doc, FormInput::Submit).expect("submit");

    assert_eq!(
        intent,
        Some(FormIntent::Create(NewTripEvent {
            event_type: EventType::Taxi,
            base_price: 12,
            date_from: now,
            date_to: now,
            destination: DestinationId(2),
            offers: Vec::new(),
            is_favorite: false,
        }))
    );
}

#[test]
fn reset_restores_committed_snapshot() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    form.handle_input(&mut doc, FormInput::EventType(EventType::Bus))
        .expect("input");
    form.reset(&mut doc, &event()).expect("reset");

    assert_eq!(form.draft(), &EventDraft::from_event(&event()));
    assert_eq!(doc.live_date_inputs(), 2);
}

#[test]
fn offers_outside_the_event_type_are_not_saved_back() {
    let stored = TripEvent {
        offers: vec![OfferId(1), OfferId(99)],
        ..event()
    };
    let mut form = EditFormView::for_event(&stored, catalog());
    let mut doc = mounted(&mut form);

    let intent = form.handle_input(&mut doc, FormInput::Submit).expect("submit");

    let expected = TripEvent {
        offers: vec![OfferId(1)],
        ..event()
    };
    assert_eq!(intent, Some(FormIntent::Save(expected)));
}

#[test]
fn reset_also_drops_offers_outside_the_event_type() {
    let mut form = EditFormView::for_event(&event(), catalog());
    let mut doc = mounted(&mut form);

    let stored = TripEvent {
        offers: vec![OfferId(2), OfferId(42)],
        ..event()
    };
    form.reset(&mut doc, &stored).expect("reset");

    assert_eq!(form.draft().offers.iter().copied().collect::<Vec<_>>(), vec![OfferId(2)]);
}
