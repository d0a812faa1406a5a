//! Undoable editing on top of [`brep_kernel::Model`].
//!
//! [`Command`] is the closed set of edits, [`CommandStack`] the linear
//! undo/redo history, and [`Editor`] bundles a model with its history.

pub mod command;
pub mod editor;
pub mod stack;

pub use command::{
    Command, CreateEdge, CreateFace, CreateVertex, CreateVolume, ExtrudeFace, RemoveEdge,
    RemoveFace, RemoveVertex, RemoveVolume, Reversible,
};
pub use editor::Editor;
pub use stack::CommandStack;
