//! Observable domain models. Every mutation commits to the canonical
//! collection before its notification is raised.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use shared::domain::{
    Destination, EventId, FilterType, NewTripEvent, OffersByType, SortType, TripEvent, UpdateType,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::observable::Observable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    TripEvents,
    Destinations,
    Offers,
}

/// Payload attached to a model notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Event(TripEvent),
    Removed(EventId),
    Filter(FilterType),
    Sort(SortType),
    Loaded(ModelKind),
}

impl Payload {
    pub fn event_id(&self) -> Option<EventId> {
        match self {
            Payload::Event(event) => Some(event.id),
            Payload::Removed(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("trip event {0} not found")]
    NotFound(EventId),
    #[error("no trip event id left after {0}")]
    IdSpaceExhausted(EventId),
}

/// Canonical trip event collection, kept ordered by start date.
#[derive(Default)]
pub struct TripEventsModel {
    events: RefCell<Vec<TripEvent>>,
    observable: Observable<Payload>,
}

impl TripEventsModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&self, observer: impl Fn(UpdateType, &Payload) + 'static) {
        self.observable.add_observer(observer);
    }

    pub fn events(&self) -> Vec<TripEvent> {
        self.events.borrow().clone()
    }

    pub fn get(&self, id: EventId) -> Option<TripEvent> {
        self.events.borrow().iter().find(|event| event.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn init(&self, mut events: Vec<TripEvent>) {
        order_by_date(&mut events);
        info!(count = events.len(), "model: trip events loaded");
        *self.events.borrow_mut() = events;
        self.observable
            .notify(UpdateType::Init, Payload::Loaded(ModelKind::TripEvents));
    }

    pub fn update(&self, update_type: UpdateType, event: TripEvent) -> Result<(), ModelError> {
        {
            let mut events = self.events.borrow_mut();
            let slot = events
                .iter_mut()
                .find(|existing| existing.id == event.id)
                .ok_or(ModelError::NotFound(event.id))?;
            *slot = event.clone();
            order_by_date(&mut events);
        }
        debug!(event_id = event.id.0, update_type = ?update_type, "model: trip event updated");
        self.observable.notify(update_type, Payload::Event(event));
        Ok(())
    }

    pub fn add(
        &self,
        update_type: UpdateType,
        event: NewTripEvent,
    ) -> Result<EventId, ModelError> {
        let created = {
            let mut events = self.events.borrow_mut();
            let last_id = events.iter().map(|event| event.id.0).max().unwrap_or(0);
            let next_id = last_id
                .checked_add(1)
                .ok_or(ModelError::IdSpaceExhausted(EventId(last_id)))?;
            let created = event.with_id(EventId(next_id));
            events.push(created.clone());
            order_by_date(&mut events);
            created
        };
        info!(event_id = created.id.0, update_type = ?update_type, "model: trip event added");
        let id = created.id;
        self.observable.notify(update_type, Payload::Event(created));
        Ok(id)
    }

    pub fn delete(&self, update_type: UpdateType, id: EventId) -> Result<(), ModelError> {
        {
            let mut events = self.events.borrow_mut();
            let index = events
                .iter()
                .position(|event| event.id == id)
                .ok_or(ModelError::NotFound(id))?;
            events.remove(index);
        }
        info!(event_id = id.0, update_type = ?update_type, "model: trip event deleted");
        self.observable.notify(update_type, Payload::Removed(id));
        Ok(())
    }
}

fn order_by_date(events: &mut [TripEvent]) {
    events.sort_by_key(|event| event.date_from);
}

#[derive(Default)]
pub struct DestinationsModel {
    destinations: RefCell<Vec<Destination>>,
    observable: Observable<Payload>,
}

impl DestinationsModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&self, observer: impl Fn(UpdateType, &Payload) + 'static) {
        self.observable.add_observer(observer);
    }

    pub fn destinations(&self) -> Vec<Destination> {
        self.destinations.borrow().clone()
    }

    pub fn init(&self, destinations: Vec<Destination>) {
        info!(count = destinations.len(), "model: destinations loaded");
        *self.destinations.borrow_mut() = destinations;
        self.observable
            .notify(UpdateType::Init, Payload::Loaded(ModelKind::Destinations));
    }
}

#[derive(Default)]
pub struct OffersModel {
    offers: RefCell<Vec<OffersByType>>,
    observable: Observable<Payload>,
}

impl OffersModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&self, observer: impl Fn(UpdateType, &Payload) + 'static) {
        self.observable.add_observer(observer);
    }

    pub fn offers(&self) -> Vec<OffersByType> {
        self.offers.borrow().clone()
    }

    pub fn init(&self, offers: Vec<OffersByType>) {
        info!(types = offers.len(), "model: offers loaded");
        *self.offers.borrow_mut() = offers;
        self.observable
            .notify(UpdateType::Init, Payload::Loaded(ModelKind::Offers));
    }
}

#[derive(Default)]
pub struct FilterModel {
    filter: Cell<FilterType>,
    observable: Observable<Payload>,
}

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&self, observer: impl Fn(UpdateType, &Payload) + 'static) {
        self.observable.add_observer(observer);
    }

    pub fn filter(&self) -> FilterType {
        self.filter.get()
    }

    pub fn set_filter(&self, update_type: UpdateType, filter: FilterType) {
        self.filter.set(filter);
        debug!(filter = %filter, update_type = ?update_type, "model: filter changed");
        self.observable.notify(update_type, Payload::Filter(filter));
    }
}

#[derive(Default)]
pub struct SortModel {
    sort: Cell<SortType>,
    observable: Observable<Payload>,
}

impl SortModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&self, observer: impl Fn(UpdateType, &Payload) + 'static) {
        self.observable.add_observer(observer);
    }

    pub fn sort(&self) -> SortType {
        self.sort.get()
    }

    pub fn set_sort(&self, update_type: UpdateType, sort: SortType) {
        self.sort.set(sort);
        debug!(sort = %sort, update_type = ?update_type, "model: sort changed");
        self.observable.notify(update_type, Payload::Sort(sort));
    }
}

/// Handles to every model, shared between the composition root and the
/// application presenter.
#[derive(Clone, Default)]
pub struct Models {
    pub trip_events: Rc<TripEventsModel>,
    pub destinations: Rc<DestinationsModel>,
    pub offers: Rc<OffersModel>,
    pub filter: Rc<FilterModel>,
    pub sort: Rc<SortModel>,
}

impl Models {
    pub fn new() -> Self {
        Self::default()
    }
}
