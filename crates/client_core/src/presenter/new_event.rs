use std::rc::Rc;

use chrono::{DateTime, Utc};
use shared::domain::UpdateType;
use tracing::debug;

use crate::{
    catalog::Catalog,
    edit_token::{EditToken, EditorSlot},
    input::FormInput,
    presenter::{PresenterError, PresenterRequest, UserAction},
    render::{mount, unmount, Document, NodeId, RenderError, RenderPosition, View},
    view::{EditFormView, FormIntent},
};

/// The create-event draft. Lives exactly as long as the create flow and
/// holds the edit token for the whole time.
pub struct NewEventPresenter {
    list: NodeId,
    form: EditFormView,
    token: EditToken,
}

impl NewEventPresenter {
    pub fn new(list: NodeId, catalog: Rc<Catalog>, now: DateTime<Utc>, token: EditToken) -> Self {
        Self {
            list,
            form: EditFormView::for_create(catalog, now),
            token,
        }
    }

    pub fn form(&self) -> &EditFormView {
        &self.form
    }

    pub fn element(&self) -> Option<NodeId> {
        self.form.element()
    }

    /// Prepends the blank form to the list.
    pub fn init(&mut self, doc: &mut Document) -> Result<(), RenderError> {
        mount(doc, &mut self.form, self.list, RenderPosition::AfterBegin)?;
        doc.add_key_listener(self.token.slot());
        debug!("presenter: create form opened");
        Ok(())
    }

    pub fn handle_form_input(
        &mut self,
        doc: &mut Document,
        input: FormInput,
    ) -> Result<Option<PresenterRequest>, PresenterError> {
        let request = self
            .form
            .handle_input(doc, input)?
            .and_then(|intent| match intent {
                FormIntent::Create(event) => Some(PresenterRequest::Action(
                    UserAction::Create(event),
                    UpdateType::Major,
                )),
                FormIntent::Cancel => Some(PresenterRequest::CloseEdit(EditorSlot::Create)),
                FormIntent::Save(_) | FormIntent::Rollup | FormIntent::Delete(_) => None,
            });
        Ok(request)
    }

    pub fn destroy(mut self, doc: &mut Document) {
        doc.remove_key_listener(self.token.slot());
        unmount(doc, &mut self.form);
        debug!("presenter: create form closed");
    }
}
