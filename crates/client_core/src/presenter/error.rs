use shared::domain::EventId;
use thiserror::Error;

use crate::{
    edit_token::{EditorSlot, GateError},
    model::ModelError,
    render::RenderError,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenterError {
    #[error("no presenter for trip event {0}")]
    UnknownEvent(EventId),
    #[error("no open editor for {0}")]
    EditorNotOpen(EditorSlot),
    #[error("row for trip event {0} is not on screen")]
    RowNotShown(EventId),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Gate(#[from] GateError),
}
