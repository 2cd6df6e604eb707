use std::rc::Rc;

use chrono::{DateTime, Utc};
use shared::domain::{EventId, NewTripEvent, TripEvent};
use tracing::debug;

use crate::{
    catalog::Catalog,
    draft::{EventDraft, ValidationError},
    input::FormInput,
    render::{update_element, DateInputHandle, Document, NodeId, RenderError, View},
    view::format::{capitalize, format_date_time},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Edit,
    Create,
}

/// What a form asks its presenter to do. Validation failures never produce
/// an intent; they stay in the form as `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormIntent {
    Save(TripEvent),
    Create(NewTripEvent),
    Rollup,
    Delete(EventId),
    Cancel,
}

pub struct EditFormView {
    draft: EventDraft,
    catalog: Rc<Catalog>,
    mode: FormMode,
    destination_text: String,
    price_text: String,
    error: Option<ValidationError>,
    date_from_input: Option<DateInputHandle>,
    date_to_input: Option<DateInputHandle>,
    element: Option<NodeId>,
}

impl EditFormView {
    pub fn for_event(event: &TripEvent, catalog: Rc<Catalog>) -> Self {
        let draft = offered_draft(&catalog, event);
        Self::with_draft(draft, catalog, FormMode::Edit)
    }

    pub fn for_create(catalog: Rc<Catalog>, now: DateTime<Utc>) -> Self {
        Self::with_draft(EventDraft::blank(now), catalog, FormMode::Create)
    }

    fn with_draft(draft: EventDraft, catalog: Rc<Catalog>, mode: FormMode) -> Self {
        let destination_text = destination_name(&catalog, &draft);
        let price_text = draft
            .base_price
            .map(|price| price.to_string())
            .unwrap_or_default();
        Self {
            draft,
            catalog,
            mode,
            destination_text,
            price_text,
            error: None,
            date_from_input: None,
            date_to_input: None,
            element: None,
        }
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    pub fn destination_text(&self) -> &str {
        &self.destination_text
    }

    pub fn price_text(&self) -> &str {
        &self.price_text
    }

    pub fn date_inputs(&self) -> (Option<DateInputHandle>, Option<DateInputHandle>) {
        (self.date_from_input, self.date_to_input)
    }

    /// Throws away in-progress edits and shows `event` again.
    pub fn reset(&mut self, doc: &mut Document, event: &TripEvent) -> Result<(), RenderError> {
        self.draft = offered_draft(&self.catalog, event);
        self.destination_text = destination_name(&self.catalog, &self.draft);
        self.price_text = event.base_price.to_string();
        self.error = None;
        update_element(doc, self)
    }

    pub fn handle_input(
        &mut self,
        doc: &mut Document,
        input: FormInput,
    ) -> Result<Option<FormIntent>, RenderError> {
        match input {
            FormInput::EventType(event_type) => {
                self.draft.event_type = event_type;
                self.draft.offers.clear();
            }
            FormInput::Destination(text) => match self.catalog.destination_by_name(&text) {
                Some(destination) => {
                    self.draft.destination = Some(destination.id);
                    self.destination_text = destination.name.clone();
                }
                None => {
                    debug!(input = %text, "form: unknown destination, reverting input");
                    self.destination_text = destination_name(&self.catalog, &self.draft);
                }
            },
            FormInput::Price(text) => {
                let digits: String = text.chars().filter(char::is_ascii_digit).collect();
                if digits.is_empty() {
                    self.draft.base_price = None;
                    self.price_text.clear();
                } else if let Ok(price) = digits.parse::<u32>() {
                    self.draft.base_price = Some(price);
                    self.price_text = digits;
                } else {
                    debug!(input = %text, "form: price out of range, reverting input");
                }
            }
            FormInput::ToggleOffer(offer_id) => {
                if self.catalog.offer(self.draft.event_type, offer_id).is_none() {
                    debug!(offer_id = offer_id.0, "form: offer not available for event type");
                    return Ok(None);
                }
                if !self.draft.offers.remove(&offer_id) {
                    self.draft.offers.insert(offer_id);
                }
            }
            FormInput::DateFrom(date) => {
                self.draft.date_from = date;
                if let Some(handle) = self.date_from_input {
                    doc.set_date_input(handle, date)?;
                }
            }
            FormInput::DateTo(date) => {
                self.draft.date_to = date;
                if let Some(handle) = self.date_to_input {
                    doc.set_date_input(handle, date)?;
                }
            }
            FormInput::Submit => return self.submit(doc),
            FormInput::Rollup => {
                return Ok(match self.mode {
                    FormMode::Edit => Some(FormIntent::Rollup),
                    FormMode::Create => None,
                });
            }
            FormInput::Reset => {
                return Ok(match (self.mode, self.draft.id) {
                    (FormMode::Edit, Some(id)) => Some(FormIntent::Delete(id)),
                    (FormMode::Edit, None) => None,
                    (FormMode::Create, _) => Some(FormIntent::Cancel),
                });
            }
        }

        self.error = None;
        update_element(doc, self)?;
        Ok(None)
    }

    fn submit(&mut self, doc: &mut Document) -> Result<Option<FormIntent>, RenderError> {
        let intent = match self.mode {
            FormMode::Edit => self.draft.to_event().map(FormIntent::Save),
            FormMode::Create => self.draft.to_new_event().map(FormIntent::Create),
        };
        match intent {
            Ok(intent) => Ok(Some(intent)),
            Err(err) => {
                debug!(error = %err, "form: submit rejected");
                self.error = Some(err);
                update_element(doc, self)?;
                Ok(None)
            }
        }
    }
}

/// Draft of `event` keeping only offers its type actually provides.
fn offered_draft(catalog: &Catalog, event: &TripEvent) -> EventDraft {
    let mut draft = EventDraft::from_event(event);
    let event_type = draft.event_type;
    draft.offers.retain(|id| {
        let known = catalog.offer(event_type, *id).is_some();
        if !known {
            debug!(
                event_id = event.id.0,
                offer_id = id.0,
                "form: dropping offer not provided for event type"
            );
        }
        known
    });
    draft
}

fn destination_name(catalog: &Catalog, draft: &EventDraft) -> String {
    draft
        .destination
        .and_then(|id| catalog.destination(id))
        .map(|destination| destination.name.clone())
        .unwrap_or_default()
}

impl View for EditFormView {
    fn template(&self) -> String {
        let draft = &self.draft;
        let title = match (self.mode, draft.id) {
            (FormMode::Create, _) | (_, None) => "new event".to_string(),
            (FormMode::Edit, Some(id)) => format!("edit #{id}"),
        };
        let types: Vec<&str> = self
            .catalog
            .event_types()
            .into_iter()
            .map(|kind| kind.as_str())
            .collect();

        let mut lines = vec![
            format!("[{title}]"),
            format!(
                "type: {} (choose: {})",
                capitalize(draft.event_type.as_str()),
                types.join(", ")
            ),
            format!("destination: {}", self.destination_text),
            format!(
                "time: {} - {}",
                format_date_time(draft.date_from),
                format_date_time(draft.date_to)
            ),
            format!("price: €{}", self.price_text),
        ];

        let offers = self.catalog.offers_for(draft.event_type);
        if !offers.is_empty() {
            let items: Vec<String> = offers
                .iter()
                .map(|offer| {
                    let mark = if draft.offers.contains(&offer.id) { "x" } else { " " };
                    format!("[{mark}] {} +€{}", offer.title, offer.price)
                })
                .collect();
            lines.push(format!("offers: {}", items.join("  ")));
        }

        if let Some(destination) = draft.destination.and_then(|id| self.catalog.destination(id)) {
            lines.push(format!("about {}: {}", destination.name, destination.description));
            if !destination.pictures.is_empty() {
                lines.push(format!("photos: {}", destination.pictures.len()));
            }
        }

        if let Some(error) = self.error {
            lines.push(format!("error: {error}"));
        }

        lines.push(match self.mode {
            FormMode::Edit => "[Save] [Delete] [^]".to_string(),
            FormMode::Create => "[Save] [Cancel]".to_string(),
        });
        lines.join("\n")
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element(&mut self, element: Option<NodeId>) {
        self.element = element;
    }

    fn restore_handlers(&mut self, doc: &mut Document, element: NodeId) {
        self.date_from_input = Some(doc.bind_date_input(element, self.draft.date_from));
        self.date_to_input = Some(doc.bind_date_input(element, self.draft.date_to));
    }

    fn release(&mut self, doc: &mut Document) {
        if let Some(handle) = self.date_from_input.take() {
            doc.release_date_input(handle);
        }
        if let Some(handle) = self.date_to_input.take() {
            doc.release_date_input(handle);
        }
    }
}

#[cfg(test)]
#[path = "../tests/edit_form_tests.rs"]
mod tests;
