use brep_kernel::{Model, ModelConfig, ModelError};

use crate::command::Command;
use crate::stack::CommandStack;

/// A model paired with its edit history.
///
/// Edits go through [`Editor::execute`] so that every change is undoable;
/// the model is only exposed read-only.
#[derive(Debug, Default)]
pub struct Editor {
    model: Model,
    history: CommandStack,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            model: Model::with_config(config),
            history: CommandStack::new(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    pub fn execute(&mut self, command: impl Into<Command>) -> Result<(), ModelError> {
        self.history.execute(&mut self.model, command)
    }

    pub fn undo(&mut self) -> Result<bool, ModelError> {
        self.history.undo(&mut self.model)
    }

    pub fn redo(&mut self) -> Result<bool, ModelError> {
        self.history.redo(&mut self.model)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Forget the history without touching the model.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Whether anything changed since the last [`Editor::mark_rendered`].
    pub fn should_render(&self) -> bool {
        self.model.should_render()
    }

    pub fn mark_rendered(&mut self) {
        self.model.reset_dirty_flags();
    }

    pub fn into_parts(self) -> (Model, CommandStack) {
        (self.model, self.history)
    }
}
