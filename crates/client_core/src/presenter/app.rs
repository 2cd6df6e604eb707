use std::{cell::RefCell, collections::HashMap, collections::VecDeque, rc::Rc};

use shared::domain::{EventId, FilterType, SortType, TripEvent, UpdateType};
use tracing::{debug, error, info, warn};

use crate::{
    catalog::Catalog,
    clock::Clock,
    derived::{derive_list, filter_availability},
    edit_token::{EditGate, EditorSlot},
    input::UserInput,
    model::{ModelKind, Models, Payload},
    presenter::{
        FilterPresenter, NewEventPresenter, PresenterError, PresenterRequest, SortPresenter,
        TripEventPresenter, UserAction,
    },
    render::{mount, unmount, Document, NodeId, RenderError, RenderPosition, View},
    view::{MessageView, NewEventButtonView, PlaceholderMessage, TripEventsListView},
};

/// Static anchors the application presenter renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub filters: NodeId,
    pub trigger: NodeId,
    pub events: NodeId,
}

impl Regions {
    pub fn create(doc: &mut Document) -> Self {
        Self {
            trigger: doc.create_region("trip main"),
            filters: doc.create_region("trip filters"),
            events: doc.create_region("trip events board"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ModelNotice {
    update_type: UpdateType,
    payload: Payload,
}

type Inbox = Rc<RefCell<VecDeque<ModelNotice>>>;

fn enqueue(inbox: &Inbox) -> impl Fn(UpdateType, &Payload) + 'static {
    let inbox = Rc::clone(inbox);
    move |update_type, payload| {
        inbox.borrow_mut().push_back(ModelNotice {
            update_type,
            payload: payload.clone(),
        });
    }
}

/// One pending flag per model; each is cleared by that model's INIT.
#[derive(Debug, Clone, Copy)]
struct LoadingState {
    trip_events: bool,
    destinations: bool,
    offers: bool,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self {
            trip_events: true,
            destinations: true,
            offers: true,
        }
    }
}

impl LoadingState {
    fn loaded(&mut self, kind: ModelKind) {
        match kind {
            ModelKind::TripEvents => self.trip_events = false,
            ModelKind::Destinations => self.destinations = false,
            ModelKind::Offers => self.offers = false,
        }
    }

    fn is_loading(&self) -> bool {
        self.trip_events || self.destinations || self.offers
    }
}

/// Owns the derived list, the presenter registry, the loading gate and the
/// create flow. Model notifications are collected in an inbox and applied
/// after each input, once the mutation that raised them has returned.
pub struct AppPresenter {
    models: Models,
    clock: Rc<dyn Clock>,
    regions: Regions,
    inbox: Inbox,
    loading: LoadingState,
    catalog: Rc<Catalog>,
    gate: EditGate,
    list_view: TripEventsListView,
    message: Option<MessageView>,
    trigger: NewEventButtonView,
    filters: FilterPresenter,
    sort: SortPresenter,
    presenters: HashMap<EventId, TripEventPresenter>,
    rendered: Vec<EventId>,
    new_event: Option<NewEventPresenter>,
}

impl AppPresenter {
    pub fn new(models: Models, clock: Rc<dyn Clock>, regions: Regions) -> Self {
        let inbox: Inbox = Rc::default();
        models.filter.add_observer(enqueue(&inbox));
        models.trip_events.add_observer(enqueue(&inbox));
        models.sort.add_observer(enqueue(&inbox));
        models.offers.add_observer(enqueue(&inbox));
        models.destinations.add_observer(enqueue(&inbox));

        Self {
            models,
            clock,
            regions,
            inbox,
            loading: LoadingState::default(),
            catalog: Rc::new(Catalog::default()),
            gate: EditGate::new(),
            list_view: TripEventsListView::new(),
            message: None,
            trigger: NewEventButtonView::new(),
            filters: FilterPresenter::new(regions.filters),
            sort: SortPresenter::new(),
            presenters: HashMap::new(),
            rendered: Vec::new(),
            new_event: None,
        }
    }

    /// Mounts the static surface and shows the loading placeholder.
    pub fn init(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        mount(doc, &mut self.trigger, self.regions.trigger, RenderPosition::BeforeEnd)?;
        mount(doc, &mut self.list_view, self.regions.events, RenderPosition::BeforeEnd)?;
        self.render_filters(doc)?;
        self.render_list(doc)?;
        info!("presenter: application initialized");
        Ok(())
    }

    /// Filtered, then sorted. Day order is the model's own date order.
    pub fn derived_list(&self) -> Vec<TripEvent> {
        derive_list(
            &self.models.trip_events.events(),
            self.models.filter.filter(),
            self.models.sort.sort(),
            self.clock.now(),
        )
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn presenter(&self, id: EventId) -> Option<&TripEventPresenter> {
        self.presenters.get(&id)
    }

    /// Ids of the rendered rows, top to bottom.
    pub fn rendered_ids(&self) -> &[EventId] {
        &self.rendered
    }

    pub fn editor_holder(&self) -> Option<EditorSlot> {
        self.gate.holder()
    }

    pub fn open_editor_count(&self) -> usize {
        let open_rows = self
            .presenters
            .values()
            .filter(|presenter| presenter.is_editing())
            .count();
        open_rows + usize::from(self.new_event.is_some())
    }

    pub fn new_event(&self) -> Option<&NewEventPresenter> {
        self.new_event.as_ref()
    }

    pub fn is_trigger_disabled(&self) -> bool {
        self.trigger.is_disabled()
    }

    pub fn is_sort_shown(&self) -> bool {
        self.sort.is_shown()
    }

    pub fn placeholder(&self) -> Option<PlaceholderMessage> {
        self.message.as_ref().map(MessageView::message)
    }

    /// Routes one input, then applies whatever notifications it raised.
    pub fn handle_input(
        &mut self,
        doc: &mut Document,
        input: UserInput,
    ) -> Result<(), PresenterError> {
        let routed = self.route_input(doc, input);
        let flushed = self.process_notices(doc);
        routed.and(flushed)
    }

    /// Drains the inbox in arrival order. A failing notice is logged and
    /// does not stop the ones behind it; the first error is returned.
    pub fn process_notices(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        let mut first_error = None;
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(notice) = next else {
                break;
            };
            if let Err(err) = self.handle_model_event(doc, notice.update_type, notice.payload) {
                error!(error = %err, "presenter: model notification failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn handle_model_event(
        &mut self,
        doc: &mut Document,
        update_type: UpdateType,
        payload: Payload,
    ) -> Result<(), PresenterError> {
        debug!(update_type = ?update_type, payload = ?payload, "presenter: model notification");
        match update_type {
            UpdateType::Patch => match payload {
                Payload::Event(event) => {
                    let presenter = self
                        .presenters
                        .get_mut(&event.id)
                        .ok_or(PresenterError::UnknownEvent(event.id))?;
                    presenter.init(doc, event)?;
                }
                other => {
                    warn!(payload = ?other, "presenter: patch without an event, rebuilding");
                    self.rebuild(doc)?;
                }
            },
            UpdateType::Minor | UpdateType::Major => self.rebuild(doc)?,
            UpdateType::Init => {
                if let Payload::Loaded(kind) = payload {
                    self.loading.loaded(kind);
                }
                self.rebuild(doc)?;
            }
        }
        self.render_filters(doc)?;
        Ok(())
    }

    fn rebuild(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        self.clear_list(doc);
        self.render_list(doc)
    }

    fn clear_list(&mut self, doc: &mut Document) {
        for presenter in self.presenters.values_mut() {
            presenter.destroy(doc);
        }
        self.presenters.clear();
        self.rendered.clear();
        self.sort.destroy(doc);
        if let Some(mut message) = self.message.take() {
            unmount(doc, &mut message);
        }
    }

    fn render_list(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        if self.loading.is_loading() {
            return self.show_message(doc, PlaceholderMessage::Loading);
        }

        self.catalog = Rc::new(Catalog::new(
            self.models.destinations.destinations(),
            self.models.offers.offers(),
        ));
        let events = self.derived_list();
        if events.is_empty() {
            let filter = self.models.filter.filter();
            return self.show_message(doc, PlaceholderMessage::Empty(filter));
        }

        self.sort
            .init(doc, self.regions.events, self.models.sort.sort())?;
        let list = self.list_view.element().ok_or(RenderError::NotMaterialized)?;
        for event in events {
            let id = event.id;
            let mut presenter = TripEventPresenter::new(list, Rc::clone(&self.catalog));
            presenter.init(doc, event)?;
            self.presenters.insert(id, presenter);
            self.rendered.push(id);
        }
        debug!(rows = self.rendered.len(), "presenter: list rendered");
        Ok(())
    }

    fn show_message(
        &mut self,
        doc: &mut Document,
        message: PlaceholderMessage,
    ) -> Result<(), PresenterError> {
        let mut view = MessageView::new(message);
        mount(doc, &mut view, self.regions.events, RenderPosition::BeforeEnd)?;
        if let Some(mut previous) = self.message.replace(view) {
            unmount(doc, &mut previous);
        }
        Ok(())
    }

    fn render_filters(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        let availability =
            filter_availability(&self.models.trip_events.events(), self.clock.now());
        self.filters
            .render(doc, self.models.filter.filter(), availability)?;
        Ok(())
    }

    fn route_input(&mut self, doc: &mut Document, input: UserInput) -> Result<(), PresenterError> {
        match input {
            UserInput::NewEventClick => self.start_new_event(doc),
            UserInput::Row { id, input } => {
                let request = self
                    .presenters
                    .get(&id)
                    .ok_or(PresenterError::UnknownEvent(id))?
                    .handle_row_input(input)?;
                self.apply(doc, request)
            }
            UserInput::Form { slot, input } => {
                let request = match slot {
                    EditorSlot::Event(id) => self
                        .presenters
                        .get_mut(&id)
                        .ok_or(PresenterError::UnknownEvent(id))?
                        .handle_form_input(doc, input)?,
                    EditorSlot::Create => self
                        .new_event
                        .as_mut()
                        .ok_or(PresenterError::EditorNotOpen(EditorSlot::Create))?
                        .handle_form_input(doc, input)?,
                };
                match request {
                    Some(request) => self.apply(doc, request),
                    None => Ok(()),
                }
            }
            UserInput::Filter(filter) => {
                match self.filters.select(filter) {
                    Some(filter) => self.models.filter.set_filter(UpdateType::Minor, filter),
                    None => debug!(filter = %filter, "presenter: filter click ignored"),
                }
                Ok(())
            }
            UserInput::Sort(sort) => {
                match self.sort.select(sort) {
                    Some(sort) => self.models.sort.set_sort(UpdateType::Minor, sort),
                    None => debug!(sort = %sort, "presenter: sort click ignored"),
                }
                Ok(())
            }
            UserInput::KeyDown(key) if key.is_dismissal() => self.dismiss(doc),
            UserInput::KeyDown(_) => Ok(()),
        }
    }

    fn apply(&mut self, doc: &mut Document, request: PresenterRequest) -> Result<(), PresenterError> {
        match request {
            PresenterRequest::OpenEdit(id) => self.open_editor(doc, id),
            PresenterRequest::Update(update_type, event) => {
                self.models.trip_events.update(update_type, event)?;
                Ok(())
            }
            PresenterRequest::Submit(event) => {
                self.close_editor(doc, EditorSlot::Event(event.id))?;
                self.models.trip_events.update(UpdateType::Minor, event)?;
                Ok(())
            }
            PresenterRequest::CloseEdit(slot) => self.close_editor(doc, slot),
            PresenterRequest::Action(action, update_type) => {
                self.dispatch_action(doc, action, update_type)
            }
        }
    }

    /// The single funnel for structural changes to the trip events model.
    pub fn dispatch_action(
        &mut self,
        doc: &mut Document,
        action: UserAction,
        update_type: UpdateType,
    ) -> Result<(), PresenterError> {
        match action {
            UserAction::Create(event) => {
                self.close_new_event(doc)?;
                let id = self.models.trip_events.add(update_type, event)?;
                info!(event_id = id.0, "presenter: trip event created");
            }
            UserAction::Delete(id) => {
                self.models.trip_events.delete(update_type, id)?;
                info!(event_id = id.0, "presenter: trip event deleted");
            }
        }
        Ok(())
    }

    fn open_editor(&mut self, doc: &mut Document, id: EventId) -> Result<(), PresenterError> {
        let slot = EditorSlot::Event(id);
        if self.gate.holder() == Some(slot) {
            return Ok(());
        }
        if !self.presenters.contains_key(&id) {
            return Err(PresenterError::UnknownEvent(id));
        }
        self.revoke_editor(doc)?;
        let token = self.gate.acquire(slot)?;
        let presenter = self
            .presenters
            .get_mut(&id)
            .ok_or(PresenterError::UnknownEvent(id))?;
        presenter.begin_edit(doc, token)?;
        Ok(())
    }

    /// Closes whichever editor currently holds the token, discarding its
    /// edits.
    fn revoke_editor(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        match self.gate.holder() {
            Some(EditorSlot::Event(id)) => {
                if let Some(presenter) = self.presenters.get_mut(&id) {
                    presenter.reset(doc)?;
                }
            }
            Some(EditorSlot::Create) => self.close_new_event(doc)?,
            None => {}
        }
        Ok(())
    }

    fn close_editor(&mut self, doc: &mut Document, slot: EditorSlot) -> Result<(), PresenterError> {
        match slot {
            EditorSlot::Event(id) => {
                let presenter = self
                    .presenters
                    .get_mut(&id)
                    .ok_or(PresenterError::UnknownEvent(id))?;
                if !presenter.is_editing() {
                    return Err(PresenterError::EditorNotOpen(slot));
                }
                presenter.close_edit(doc)?;
                Ok(())
            }
            EditorSlot::Create => self.close_new_event(doc),
        }
    }

    /// Escape closes the editor whose listener is registered.
    fn dismiss(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        let Some(slot) = doc.key_listeners().last().copied() else {
            return Ok(());
        };
        debug!(slot = %slot, "presenter: editor dismissed");
        match slot {
            EditorSlot::Event(id) => {
                let presenter = self
                    .presenters
                    .get_mut(&id)
                    .ok_or(PresenterError::UnknownEvent(id))?;
                presenter.reset(doc)?;
                Ok(())
            }
            EditorSlot::Create => self.close_new_event(doc),
        }
    }

    fn start_new_event(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        if self.loading.is_loading() || self.trigger.is_disabled() {
            debug!(
                loading = self.loading.is_loading(),
                "presenter: create flow unavailable"
            );
            return Ok(());
        }

        self.revoke_editor(doc)?;
        let token = self.gate.acquire(EditorSlot::Create)?;
        let list = self.list_view.element().ok_or(RenderError::NotMaterialized)?;

        self.models
            .filter
            .set_filter(UpdateType::Major, FilterType::Everything);
        self.models.sort.set_sort(UpdateType::Minor, SortType::Day);
        self.trigger.set_disabled(doc, true)?;

        let mut presenter =
            NewEventPresenter::new(list, Rc::clone(&self.catalog), self.clock.now(), token);
        presenter.init(doc)?;
        self.new_event = Some(presenter);
        Ok(())
    }

    fn close_new_event(&mut self, doc: &mut Document) -> Result<(), PresenterError> {
        let Some(presenter) = self.new_event.take() else {
            return Ok(());
        };
        presenter.destroy(doc);
        self.trigger.set_disabled(doc, false)?;
        Ok(())
    }
}
