//! The single "open editor" capability.
//!
//! `EditGate` hands out at most one `EditToken` at a time. A presenter may
//! only show an open form while it owns the token, and dropping the token
//! releases the gate, so every exit path from the editing state (close,
//! reset, destroy) gives the capability back.

use std::{cell::Cell, fmt, rc::Rc};

use shared::domain::EventId;
use thiserror::Error;

/// Which editor a token, listener or form input belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorSlot {
    Event(EventId),
    Create,
}

impl fmt::Display for EditorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorSlot::Event(id) => write!(f, "event {id}"),
            EditorSlot::Create => f.write_str("new event"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("editor already open for {0}")]
    Held(EditorSlot),
}

#[derive(Debug, Default)]
pub struct EditGate {
    holder: Rc<Cell<Option<EditorSlot>>>,
}

impl EditGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holder(&self) -> Option<EditorSlot> {
        self.holder.get()
    }

    pub fn acquire(&self, slot: EditorSlot) -> Result<EditToken, GateError> {
        if let Some(current) = self.holder.get() {
            return Err(GateError::Held(current));
        }
        self.holder.set(Some(slot));
        Ok(EditToken {
            slot,
            holder: Rc::clone(&self.holder),
        })
    }
}

#[derive(Debug)]
pub struct EditToken {
    slot: EditorSlot,
    holder: Rc<Cell<Option<EditorSlot>>>,
}

impl EditToken {
    pub fn slot(&self) -> EditorSlot {
        self.slot
    }
}

impl Drop for EditToken {
    fn drop(&mut self) {
        if self.holder.get() == Some(self.slot) {
            self.holder.set(None);
        }
    }
}
