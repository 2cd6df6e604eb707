use std::{mem, rc::Rc};

use shared::domain::{EventId, TripEvent, UpdateType};
use tracing::debug;

use crate::{
    catalog::Catalog,
    edit_token::{EditToken, EditorSlot},
    input::{FormInput, RowInput},
    presenter::{PresenterError, PresenterRequest, UserAction},
    render::{mount, replace, unmount, Document, NodeId, RenderError, RenderPosition, View},
    view::{EditFormView, FormIntent, RowIntent, TripEventView},
};

enum Mode {
    Display,
    /// Only the holder of the edit token may show an open form.
    Editing(EditToken),
}

/// Binds one trip event to its row and its edit form.
pub struct TripEventPresenter {
    list: NodeId,
    catalog: Rc<Catalog>,
    event: Option<TripEvent>,
    row: Option<TripEventView>,
    form: Option<EditFormView>,
    mode: Mode,
}

impl TripEventPresenter {
    pub fn new(list: NodeId, catalog: Rc<Catalog>) -> Self {
        Self {
            list,
            catalog,
            event: None,
            row: None,
            form: None,
            mode: Mode::Display,
        }
    }

    pub fn event(&self) -> Option<&TripEvent> {
        self.event.as_ref()
    }

    pub fn event_id(&self) -> Option<EventId> {
        self.event.as_ref().map(|event| event.id)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing(_))
    }

    pub fn row_element(&self) -> Option<NodeId> {
        self.row.as_ref().and_then(|row| row.element())
    }

    pub fn form_element(&self) -> Option<NodeId> {
        self.form.as_ref().and_then(|form| form.element())
    }

    pub fn form(&self) -> Option<&EditFormView> {
        self.form.as_ref()
    }

    /// Rebuilds both views from `event` and puts the one matching the current
    /// mode where the previous one was. On failure the previous views stay.
    pub fn init(&mut self, doc: &mut Document, event: TripEvent) -> Result<(), RenderError> {
        let mut row = TripEventView::new(&event, &self.catalog);
        let mut form = EditFormView::for_event(&event, Rc::clone(&self.catalog));

        let placed = match (self.row.as_ref(), self.form.as_ref()) {
            (Some(previous_row), Some(previous_form)) => {
                if self.is_editing() {
                    replace(doc, &mut form, previous_form)
                } else {
                    replace(doc, &mut row, previous_row)
                }
            }
            _ => mount(doc, &mut row, self.list, RenderPosition::BeforeEnd),
        };
        if let Err(err) = placed {
            unmount(doc, &mut row);
            unmount(doc, &mut form);
            return Err(err);
        }

        if let Some(mut previous) = self.row.replace(row) {
            unmount(doc, &mut previous);
        }
        if let Some(mut previous) = self.form.replace(form) {
            unmount(doc, &mut previous);
        }
        debug!(event_id = event.id.0, editing = self.is_editing(), "presenter: event rendered");
        self.event = Some(event);
        Ok(())
    }

    /// Swaps the row for the form. The dismissal key listener stays
    /// registered for as long as the token is held here.
    pub fn begin_edit(&mut self, doc: &mut Document, token: EditToken) -> Result<(), RenderError> {
        let (Some(row), Some(form)) = (self.row.as_ref(), self.form.as_mut()) else {
            return Err(RenderError::NotMaterialized);
        };
        replace(doc, form, row)?;
        doc.add_key_listener(token.slot());
        debug!(slot = %token.slot(), "presenter: editor opened");
        self.mode = Mode::Editing(token);
        Ok(())
    }

    /// Shows the row again. In-progress edits stay in the form.
    pub fn close_edit(&mut self, doc: &mut Document) -> Result<(), RenderError> {
        if !self.is_editing() {
            return Ok(());
        }
        if let (Some(row), Some(form)) = (self.row.as_mut(), self.form.as_mut()) {
            replace(doc, row, &*form)?;
            unmount(doc, form);
        }
        if let Mode::Editing(token) = mem::replace(&mut self.mode, Mode::Display) {
            doc.remove_key_listener(token.slot());
            debug!(slot = %token.slot(), "presenter: editor closed");
        }
        Ok(())
    }

    /// Discards in-progress edits and closes the form. No-op in display mode.
    pub fn reset(&mut self, doc: &mut Document) -> Result<(), RenderError> {
        if !self.is_editing() {
            return Ok(());
        }
        if let (Some(form), Some(event)) = (self.form.as_mut(), self.event.as_ref()) {
            form.reset(doc, event)?;
        }
        self.close_edit(doc)
    }

    pub fn destroy(&mut self, doc: &mut Document) {
        if let Some(row) = self.row.as_mut() {
            unmount(doc, row);
        }
        if let Some(form) = self.form.as_mut() {
            unmount(doc, form);
        }
        if let Mode::Editing(token) = mem::replace(&mut self.mode, Mode::Display) {
            doc.remove_key_listener(token.slot());
        }
    }

    pub fn handle_row_input(&self, input: RowInput) -> Result<PresenterRequest, PresenterError> {
        let (Some(event), Some(row)) = (self.event.as_ref(), self.row.as_ref()) else {
            return Err(RenderError::NotMaterialized.into());
        };
        if self.is_editing() {
            return Err(PresenterError::RowNotShown(event.id));
        }

        Ok(match row.handle_input(input) {
            RowIntent::OpenEdit => PresenterRequest::OpenEdit(event.id),
            RowIntent::ToggleFavorite => PresenterRequest::Update(
                UpdateType::Patch,
                TripEvent {
                    is_favorite: !event.is_favorite,
                    ..event.clone()
                },
            ),
        })
    }

    pub fn handle_form_input(
        &mut self,
        doc: &mut Document,
        input: FormInput,
    ) -> Result<Option<PresenterRequest>, PresenterError> {
        let Some(id) = self.event_id() else {
            return Err(RenderError::NotMaterialized.into());
        };
        let slot = EditorSlot::Event(id);
        let form = match (&self.mode, self.form.as_mut()) {
            (Mode::Editing(_), Some(form)) => form,
            _ => return Err(PresenterError::EditorNotOpen(slot)),
        };

        let request = form.handle_input(doc, input)?.and_then(|intent| match intent {
            FormIntent::Save(event) => Some(PresenterRequest::Submit(event)),
            FormIntent::Rollup => Some(PresenterRequest::CloseEdit(slot)),
            FormIntent::Delete(id) => Some(PresenterRequest::Action(
                UserAction::Delete(id),
                UpdateType::Major,
            )),
            FormIntent::Create(_) | FormIntent::Cancel => None,
        });
        Ok(request)
    }
}
