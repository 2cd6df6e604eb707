use shared::domain::FilterType;

use crate::{
    render::{swap_view, Document, NodeId, RenderError, RenderPosition},
    view::FilterView,
};

pub struct FilterPresenter {
    container: NodeId,
    view: Option<FilterView>,
}

impl FilterPresenter {
    pub fn new(container: NodeId) -> Self {
        Self {
            container,
            view: None,
        }
    }

    pub fn current(&self) -> Option<FilterType> {
        self.view.as_ref().map(FilterView::current)
    }

    /// Re-renders the bar in place.
    pub fn render(
        &mut self,
        doc: &mut Document,
        current: FilterType,
        availability: Vec<(FilterType, bool)>,
    ) -> Result<(), RenderError> {
        swap_view(
            doc,
            &mut self.view,
            FilterView::new(current, availability),
            self.container,
            RenderPosition::BeforeEnd,
        )
    }

    /// The filter to apply for a click on `filter`, if the click changes
    /// anything.
    pub fn select(&self, filter: FilterType) -> Option<FilterType> {
        let view = self.view.as_ref()?;
        (filter != view.current() && view.is_enabled(filter)).then_some(filter)
    }
}
