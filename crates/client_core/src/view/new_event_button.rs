use crate::render::{update_element, Document, NodeId, RenderError, View};

/// The "New event" trigger. Its enabled state is driven by the application
/// presenter only.
#[derive(Default)]
pub struct NewEventButtonView {
    disabled: bool,
    element: Option<NodeId>,
}

impl NewEventButtonView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, doc: &mut Document, disabled: bool) -> Result<(), RenderError> {
        if self.disabled == disabled {
            return Ok(());
        }
        self.disabled = disabled;
        update_element(doc, self)
    }
}

impl View for NewEventButtonView {
    fn template(&self) -> String {
        if self.disabled {
            "[New event] (disabled)".to_string()
        } else {
            "[New event]".to_string()
        }
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element(&mut self, element: Option<NodeId>) {
        self.element = element;
    }
}
