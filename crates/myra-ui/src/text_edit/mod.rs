//! Text editing engine: a character-indexed buffer with cursor, selection,
//! and positional undo/redo records.

pub mod editor;
pub mod undo;

pub use editor::TextEditor;
pub use undo::{OperationRecord, OperationType, UndoRedoStack, MAX_RECORDS};
