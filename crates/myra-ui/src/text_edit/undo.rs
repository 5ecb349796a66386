use std::collections::VecDeque;

/// Kind of buffer edit an [`OperationRecord`] inverts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OperationType {
    Insert,
    Delete,
    Replace,
}

/// One undo/redo log entry.
///
/// `where_` and `length` are character offsets. For `Insert` the record only
/// needs the span; for `Delete` and `Replace`, `data` holds the displaced text.
/// A `Replace` stores the length of the text that replaced `data`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OperationRecord {
    pub kind: OperationType,
    pub where_: usize,
    pub length: usize,
    pub data: String,
}

/// Maximum number of records a stack remembers. Oldest records go first.
pub const MAX_RECORDS: usize = 1000;

/// Bounded LIFO stack of [`OperationRecord`]s.
#[derive(Debug, Default)]
pub struct UndoRedoStack {
    records: VecDeque<OperationRecord>,
}

impl UndoRedoStack {
    pub fn new() -> Self {
        Self { records: VecDeque::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn peek(&self) -> Option<&OperationRecord> {
        self.records.back()
    }

    pub fn pop(&mut self) -> Option<OperationRecord> {
        self.records.pop_back()
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    fn push(&mut self, record: OperationRecord) {
        if self.records.len() == MAX_RECORDS {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Records that `length` characters were inserted at `where_`.
    pub fn make_insert(&mut self, where_: usize, length: usize) {
        self.push(OperationRecord {
            kind: OperationType::Insert,
            where_,
            length,
            data: String::new(),
        });
    }

    /// Records that `length` characters of `text` at `where_` are about to be deleted.
    pub fn make_delete(&mut self, text: &str, where_: usize, length: usize) {
        self.push(OperationRecord {
            kind: OperationType::Delete,
            where_,
            length,
            data: char_slice(text, where_, length).to_string(),
        });
    }

    /// Records that `length` characters of `text` at `where_` are about to be
    /// replaced by `new_length` characters.
    pub fn make_replace(&mut self, text: &str, where_: usize, length: usize, new_length: usize) {
        self.push(OperationRecord {
            kind: OperationType::Replace,
            where_,
            length: new_length,
            data: char_slice(text, where_, length).to_string(),
        });
    }
}

/// Byte offset of character `index`, or `s.len()` past the end.
pub(crate) fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(i, _)| i)
}

/// `len` characters of `s` starting at character `start`, clipped to the text.
pub(crate) fn char_slice(s: &str, start: usize, len: usize) -> &str {
    let from = byte_offset(s, start);
    let to = from + byte_offset(&s[from..], len);
    &s[from..to]
}
