use brep_kernel::{Model, ModelError};
use tracing::{debug, info, instrument};

use crate::command::{Command, Reversible};

/// Linear two-stack undo/redo history.
///
/// Every executed command is recorded, even when the model rejected it; a
/// rejected command's undo is a no-op. A command moves to the opposite stack
/// after undo or redo even if the model reported an error.
#[derive(Debug)]
pub struct CommandStack {
    undo: Vec<Command>,
    redo: Vec<Command>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// Execute a command against `model`, record it and clear the redo stack.
    #[instrument(skip(self, model, command), fields(command = tracing::field::Empty))]
    pub fn execute(
        &mut self,
        model: &mut Model,
        command: impl Into<Command>,
    ) -> Result<(), ModelError> {
        let mut command = command.into();
        tracing::Span::current().record("command", command.name());
        let result = command.execute(model);
        if let Err(err) = &result {
            debug!(%err, "command rejected");
        }
        self.undo.push(command);
        self.redo.clear();
        result
    }

    /// Undo the most recent command. `Ok(false)` when there is nothing to undo.
    #[instrument(skip(self, model))]
    pub fn undo(&mut self, model: &mut Model) -> Result<bool, ModelError> {
        let Some(mut command) = self.undo.pop() else {
            return Ok(false);
        };
        debug!(command = command.name(), "undo");
        let result = command.undo(model);
        self.redo.push(command);
        result.map(|()| true)
    }

    /// Re-execute the most recently undone command. `Ok(false)` when there is
    /// nothing to redo.
    #[instrument(skip(self, model))]
    pub fn redo(&mut self, model: &mut Model) -> Result<bool, ModelError> {
        let Some(mut command) = self.redo.pop() else {
            return Ok(false);
        };
        debug!(command = command.name(), "redo");
        let result = command.execute(model);
        self.undo.push(command);
        result.map(|()| true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    /// The command the next `undo` would revert.
    pub fn last(&self) -> Option<&Command> {
        self.undo.last()
    }

    /// Drop all recorded history. The model is left as it is.
    pub fn clear(&mut self) {
        info!(
            undo = self.undo.len(),
            redo = self.redo.len(),
            "clearing command history"
        );
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new()
    }
}
