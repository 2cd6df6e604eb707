use shared::domain::SortType;

use crate::{
    render::{mount, unmount, Document, NodeId, RenderError, RenderPosition},
    view::SortView,
};

/// Sort bar above the event rows. Only present while rows are shown.
#[derive(Default)]
pub struct SortPresenter {
    view: Option<SortView>,
}

impl SortPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self) -> bool {
        self.view.is_some()
    }

    pub fn init(
        &mut self,
        doc: &mut Document,
        container: NodeId,
        current: SortType,
    ) -> Result<(), RenderError> {
        let mut view = SortView::new(current);
        mount(doc, &mut view, container, RenderPosition::AfterBegin)?;
        if let Some(mut previous) = self.view.replace(view) {
            unmount(doc, &mut previous);
        }
        Ok(())
    }

    pub fn destroy(&mut self, doc: &mut Document) {
        if let Some(mut view) = self.view.take() {
            unmount(doc, &mut view);
        }
    }

    pub fn select(&self, sort: SortType) -> Option<SortType> {
        let view = self.view.as_ref()?;
        (sort != view.current()).then_some(sort)
    }
}
