use std::rc::Rc;

use tracing::info;

pub mod catalog;
pub mod clock;
pub mod derived;
pub mod draft;
pub mod edit_token;
pub mod input;
pub mod model;
pub mod observable;
pub mod presenter;
pub mod render;
pub mod source;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use edit_token::{EditGate, EditToken, EditorSlot};
pub use input::{FormInput, Key, RowInput, UserInput};
pub use model::{ModelError, Models};
pub use presenter::{AppPresenter, PresenterError, Regions};
pub use render::{Document, RenderError};
pub use source::{load_models, BundleSource, DataSource, EmptySource};

/// Composition root: owns the document, the models and the application
/// presenter, and is the only entry point for input.
pub struct ItineraryApp {
    document: Document,
    models: Models,
    presenter: AppPresenter,
}

impl ItineraryApp {
    pub fn new(clock: Rc<dyn Clock>) -> Result<Self, PresenterError> {
        let mut document = Document::new();
        let regions = Regions::create(&mut document);
        let models = Models::new();
        let mut presenter = AppPresenter::new(models.clone(), clock, regions);
        presenter.init(&mut document)?;

        Ok(Self {
            document,
            models,
            presenter,
        })
    }

    pub fn with_system_clock() -> Result<Self, PresenterError> {
        Self::new(Rc::new(SystemClock))
    }

    /// Feeds every model from `source` and renders the result.
    pub fn load(&mut self, source: &dyn DataSource) -> Result<(), PresenterError> {
        load_models(source, &self.models);
        self.presenter.process_notices(&mut self.document)?;
        info!(
            events = self.models.trip_events.len(),
            "app: itinerary ready"
        );
        Ok(())
    }

    pub fn dispatch(&mut self, input: UserInput) -> Result<(), PresenterError> {
        self.presenter.handle_input(&mut self.document, input)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub fn presenter(&self) -> &AppPresenter {
        &self.presenter
    }

    pub fn render_text(&self) -> String {
        self.document.render_text()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
