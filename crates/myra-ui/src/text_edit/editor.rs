use crate::text_edit::undo::{byte_offset, char_slice, OperationType, UndoRedoStack};

type InputFilter = Box<dyn Fn(&str) -> Option<String>>;
type TextChanged = Box<dyn FnMut(&str, &str)>;

/// Text buffer with cursor, selection, and undo/redo.
///
/// All indices are character offsets. The selection is the span between
/// `select_start` and `select_end` in either order; [`selection`] returns it
/// normalized.
///
/// Edits made through the editing operations fire both change callbacks;
/// [`set_text`] fires only `on_text_changed`. Any text change outside an
/// undo/redo replay clears the redo stack.
///
/// [`selection`]: TextEditor::selection
/// [`set_text`]: TextEditor::set_text
pub struct TextEditor {
    text: String,
    cursor: usize,
    select_start: usize,
    select_end: usize,
    insert_mode: bool,

    undo_stack: UndoRedoStack,
    redo_stack: UndoRedoStack,
    suppress_redo_reset: bool,

    input_filter: Option<InputFilter>,
    on_text_changed: Option<TextChanged>,
    on_text_changed_by_user: Option<TextChanged>,
}

impl TextEditor {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            select_start: 0,
            select_end: 0,
            insert_mode: false,
            undo_stack: UndoRedoStack::new(),
            redo_stack: UndoRedoStack::new(),
            suppress_redo_reset: false,
            input_filter: None,
            on_text_changed: None,
            on_text_changed_by_user: None,
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut editor = Self::new();
        editor.set_text(text);
        editor
    }

    // ── state ─────────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor, clamped to the text, and collapses the selection onto it.
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.len());
        self.select_start = self.cursor;
        self.select_end = self.cursor;
    }

    pub fn insert_mode(&self) -> bool {
        self.insert_mode
    }

    pub fn set_insert_mode(&mut self, value: bool) {
        self.insert_mode = value;
    }

    pub fn undo_stack(&self) -> &UndoRedoStack {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &UndoRedoStack {
        &self.redo_stack
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ── callbacks ─────────────────────────────────────────────────────────

    /// Installs a filter run on every text assignment. Returning `None`
    /// rejects the new text; returning `Some` substitutes it.
    pub fn set_input_filter(&mut self, f: impl Fn(&str) -> Option<String> + 'static) {
        self.input_filter = Some(Box::new(f));
    }

    /// Called with `(old, new)` after every text change.
    pub fn set_on_text_changed(&mut self, f: impl FnMut(&str, &str) + 'static) {
        self.on_text_changed = Some(Box::new(f));
    }

    /// Called with `(old, new)` after text changes made by editing operations.
    pub fn set_on_text_changed_by_user(&mut self, f: impl FnMut(&str, &str) + 'static) {
        self.on_text_changed_by_user = Some(Box::new(f));
    }

    // ── selection ─────────────────────────────────────────────────────────

    /// Normalized `(start, end)` of the selection.
    pub fn selection(&self) -> (usize, usize) {
        (self.select_start.min(self.select_end), self.select_start.max(self.select_end))
    }

    pub fn has_selection(&self) -> bool {
        self.select_start != self.select_end
    }

    /// Sets the raw selection ends; the cursor moves to `end`.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.select_start = start;
        self.select_end = end;
        self.cursor = end;
    }

    pub fn select_all(&mut self) {
        let len = self.len();
        self.select_start = 0;
        self.select_end = len;
        self.cursor = len;
    }

    pub fn selected_text(&self) -> &str {
        let (start, end) = self.selection();
        char_slice(&self.text, start, end - start)
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.set_cursor(self.cursor - 1);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.set_cursor(self.cursor + 1);
        }
    }

    /// Pulls selection and cursor back inside the text after it shrank.
    pub fn clamp(&mut self) {
        let n = self.len();
        if self.select_start != self.select_end {
            if self.select_start > n {
                self.select_start = n;
            }
            if self.select_end > n {
                self.select_end = n;
            }
            if self.select_start == self.select_end {
                self.cursor = self.select_start;
            }
        }
        if self.cursor > n {
            self.cursor = n;
        }
    }

    // ── text assignment ───────────────────────────────────────────────────

    /// Programmatic assignment. Returns `false` when the text did not change.
    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        self.assign(value.into(), false)
    }

    fn assign(&mut self, value: String, by_user: bool) -> bool {
        let mut value = strip_cr(value);
        if value == self.text {
            return false;
        }

        if let Some(filter) = &self.input_filter {
            match filter(&value) {
                Some(filtered) => value = filtered,
                None => return false,
            }
        }

        let old = std::mem::replace(&mut self.text, value);
        if !self.suppress_redo_reset {
            self.redo_stack.reset();
        }

        if let Some(f) = self.on_text_changed.as_mut() {
            f(&old, &self.text);
        }
        if by_user {
            if let Some(f) = self.on_text_changed_by_user.as_mut() {
                f(&old, &self.text);
            }
        }
        true
    }

    // ── buffer primitives ─────────────────────────────────────────────────

    /// Splices out `len` characters at `pos`. Records nothing; callers that
    /// want the edit undoable record the Delete first.
    pub fn delete_chars(&mut self, pos: usize, len: usize) {
        if len == 0 {
            return;
        }
        let from = byte_offset(&self.text, pos);
        let to = from + byte_offset(&self.text[from..], len);
        let mut value = String::with_capacity(self.text.len() - (to - from));
        value.push_str(&self.text[..from]);
        value.push_str(&self.text[to..]);
        self.assign(value, true);
    }

    /// Splices `s` in at `pos`. Returns the number of characters inserted.
    fn splice(&mut self, pos: usize, s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let at = byte_offset(&self.text, pos);
        let mut value = String::with_capacity(self.text.len() + s.len());
        value.push_str(&self.text[..at]);
        value.push_str(s);
        value.push_str(&self.text[at..]);
        self.assign(value, true);
        s.chars().count()
    }

    // ── editing operations ────────────────────────────────────────────────

    /// Inserts `s` at `pos` as one undoable step. A cursor at or after `pos`
    /// shifts forward by the inserted length. `pos` past the end appends.
    pub fn insert_chars(&mut self, pos: usize, s: &str) -> usize {
        let pos = pos.min(self.len());
        let s = strip_cr(s.to_string());
        let inserted = self.splice(pos, &s);
        if inserted == 0 {
            return 0;
        }
        self.undo_stack.make_insert(pos, inserted);
        if self.cursor >= pos {
            self.cursor += inserted;
        }
        inserted
    }

    pub fn insert_char(&mut self, pos: usize, ch: char) -> usize {
        self.insert_chars(pos, ch.encode_utf8(&mut [0; 4]))
    }

    /// Replaces `len` characters at `where_` with `text` as one undoable step.
    /// Both are clipped to the current text.
    pub fn replace(&mut self, where_: usize, len: usize, text: &str) {
        let where_ = where_.min(self.len());
        let len = len.min(self.len() - where_);
        let text = strip_cr(text.to_string());
        let new_length = text.chars().count();
        self.undo_stack.make_replace(&self.text, where_, len, new_length);
        self.delete_chars(where_, len);
        self.splice(where_, &text);
        self.clamp();
    }

    pub fn replace_all(&mut self, text: &str) {
        let len = self.len();
        self.replace(0, len, text);
    }

    /// Undoable delete. `where_` past the end is a no-op and `len` is clipped
    /// to the remaining text.
    pub fn delete(&mut self, where_: usize, len: usize) {
        let n = self.len();
        if where_ >= n {
            return;
        }
        let len = len.min(n - where_);
        self.undo_stack.make_delete(&self.text, where_, len);
        self.delete_chars(where_, len);
    }

    pub fn delete_selection(&mut self) {
        self.clamp();
        if self.select_start == self.select_end {
            return;
        }
        let (start, end) = self.selection();
        self.delete(start, end - start);
        self.select_start = start;
        self.select_end = start;
        self.cursor = start;
    }

    /// Replaces the selection with `text`. Returns `false` if nothing was inserted.
    pub fn paste(&mut self, text: &str) -> bool {
        self.delete_selection();
        let inserted = self.insert_chars(self.cursor, text);
        self.select_start = self.cursor;
        self.select_end = self.cursor;
        inserted != 0
    }

    /// Types one character. `\n` is ignored; see [`input_newline`].
    ///
    /// [`input_newline`]: TextEditor::input_newline
    pub fn input_char(&mut self, ch: char) {
        if ch == '\n' {
            return;
        }
        self.type_char(ch);
    }

    /// Types a line break, for multi-line hosts.
    pub fn input_newline(&mut self) {
        self.type_char('\n');
    }

    fn type_char(&mut self, ch: char) {
        if self.insert_mode && !self.has_selection() && self.cursor < self.len() {
            let pos = self.cursor;
            self.undo_stack.make_replace(&self.text, pos, 1, 1);
            self.delete_chars(pos, 1);
            if self.splice(pos, ch.encode_utf8(&mut [0; 4])) != 0 {
                self.cursor += 1;
            }
        } else {
            self.delete_selection();
            let pos = self.cursor;
            if self.splice(pos, ch.encode_utf8(&mut [0; 4])) != 0 {
                self.undo_stack.make_insert(pos, 1);
                self.cursor += 1;
            }
        }
        self.select_start = self.cursor;
        self.select_end = self.cursor;
    }

    // ── undo / redo ───────────────────────────────────────────────────────

    pub fn undo(&mut self) {
        self.replay(true);
    }

    pub fn redo(&mut self) {
        self.replay(false);
    }

    /// Pops one record from the source stack, applies its inverse, and pushes
    /// the inverse of that onto the opposite stack.
    fn replay(&mut self, undo: bool) {
        let source = if undo { &mut self.undo_stack } else { &mut self.redo_stack };
        let Some(record) = source.pop() else {
            return;
        };
        log::trace!(
            "{} {:?} at {} ({} chars)",
            if undo { "undo" } else { "redo" },
            record.kind,
            record.where_,
            record.length
        );

        self.suppress_redo_reset = true;
        match record.kind {
            OperationType::Insert => {
                let target = if undo { &mut self.redo_stack } else { &mut self.undo_stack };
                target.make_delete(&self.text, record.where_, record.length);
                self.delete_chars(record.where_, record.length);
                self.cursor = record.where_;
            }
            OperationType::Delete => {
                let length = self.splice(record.where_, &record.data);
                let target = if undo { &mut self.redo_stack } else { &mut self.undo_stack };
                target.make_insert(record.where_, length);
                self.cursor = record.where_ + length;
            }
            OperationType::Replace => {
                let target = if undo { &mut self.redo_stack } else { &mut self.undo_stack };
                target.make_replace(
                    &self.text,
                    record.where_,
                    record.length,
                    record.data.chars().count(),
                );
                self.delete_chars(record.where_, record.length);
                self.splice(record.where_, &record.data);
            }
        }
        self.suppress_redo_reset = false;

        self.select_start = self.cursor;
        self.select_end = self.cursor;
        self.clamp();
    }
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_cr(value: String) -> String {
    if value.contains('\r') { value.replace('\r', "") } else { value }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn editor(text: &str, cursor: usize) -> TextEditor {
        let mut e = TextEditor::with_text(text);
        e.set_cursor(cursor);
        e
    }

    #[test]
    fn insert_then_undo_then_redo() {
        let mut e = editor("hello", 5);
        e.insert_chars(5, " world");
        assert_eq!(e.text(), "hello world");
        assert_eq!(e.cursor(), 11);
        let rec = e.undo_stack().peek().unwrap();
        assert_eq!((rec.kind, rec.where_, rec.length), (OperationType::Insert, 5, 6));
        assert_eq!(e.undo_stack().len(), 1);

        e.undo();
        assert_eq!(e.text(), "hello");
        assert_eq!(e.cursor(), 5);
        let rec = e.redo_stack().peek().unwrap();
        assert_eq!((rec.kind, rec.where_, rec.length), (OperationType::Delete, 5, 6));
        assert_eq!(rec.data, " world");

        e.redo();
        assert_eq!(e.text(), "hello world");
        assert_eq!(e.cursor(), 11);
    }

    #[test]
    fn edits_past_the_end_append_and_undo_cleanly() {
        let mut e = editor("abc", 0);
        e.insert_chars(10, "x");
        assert_eq!(e.text(), "abcx");
        assert_eq!(e.undo_stack().peek().unwrap().where_, 3);
        e.undo();
        assert_eq!(e.text(), "abc");
        e.redo();
        assert_eq!(e.text(), "abcx");

        let mut e = editor("abc", 0);
        e.replace(5, 2, "zz");
        assert_eq!(e.text(), "abczz");
        e.undo();
        assert_eq!(e.text(), "abc");
        e.redo();
        assert_eq!(e.text(), "abczz");
    }

    #[test]
    fn replace_is_one_record_and_undoes_exactly() {
        let mut e = editor("hello world", 0);
        e.replace(0, 5, "HELLO");
        assert_eq!(e.text(), "HELLO world");
        assert_eq!(e.undo_stack().len(), 1);
        e.undo();
        assert_eq!(e.text(), "hello world");
        e.redo();
        assert_eq!(e.text(), "HELLO world");
    }

    #[test]
    fn replace_with_different_length_round_trips() {
        let mut e = editor("abc def", 0);
        e.replace(4, 3, "xy");
        e.replace(0, 1, "ZZZZ");
        assert_eq!(e.text(), "ZZZZbc xy");
        e.undo();
        assert_eq!(e.text(), "abc xy");
        e.undo();
        assert_eq!(e.text(), "abc def");
        e.redo();
        e.redo();
        assert_eq!(e.text(), "ZZZZbc xy");
    }

    #[test]
    fn undo_all_then_redo_all_round_trips() {
        let mut e = editor("The quick fox", 0);
        let mut states = vec![e.text().to_string()];

        e.insert_chars(4, "very ");
        states.push(e.text().to_string());
        e.delete(0, 4);
        states.push(e.text().to_string());
        e.replace(5, 5, "slow");
        states.push(e.text().to_string());
        e.insert_chars(e.len(), "!");
        states.push(e.text().to_string());
        e.set_cursor(0);
        e.set_insert_mode(true);
        e.input_char('V');
        states.push(e.text().to_string());

        for expected in states.iter().rev().skip(1) {
            e.undo();
            assert_eq!(e.text(), expected);
        }
        assert!(!e.can_undo());

        for expected in states.iter().skip(1) {
            e.redo();
            assert_eq!(e.text(), expected);
        }
        assert!(!e.can_redo());
    }

    #[test]
    fn empty_operations_are_silent() {
        let mut e = editor("abc", 1);
        assert_eq!(e.insert_chars(1, ""), 0);
        e.delete_chars(1, 0);
        e.undo();
        e.redo();
        assert_eq!(e.text(), "abc");
        assert!(!e.can_undo());
        assert!(!e.paste(""));
    }

    #[test]
    fn delete_out_of_range_is_noop_and_len_is_clipped() {
        let mut e = editor("abc", 0);
        e.delete(3, 1);
        assert_eq!(e.text(), "abc");
        assert!(!e.can_undo());
        e.delete(1, 10);
        assert_eq!(e.text(), "a");
        assert_eq!(e.undo_stack().peek().unwrap().data, "bc");
    }

    #[test]
    fn user_edit_clears_redo_but_replay_does_not() {
        let mut e = editor("ab", 2);
        e.insert_chars(2, "c");
        e.insert_chars(3, "d");
        e.undo();
        e.undo();
        assert_eq!(e.redo_stack().len(), 2);
        e.input_char('x');
        assert!(!e.can_redo());
    }

    #[test]
    fn programmatic_set_text_keeps_undo_history() {
        let mut e = editor("ab", 2);
        e.insert_chars(2, "c");
        e.undo();
        assert!(e.can_redo());
        e.set_text("zzz");
        assert!(!e.can_redo());
        e.insert_chars(0, "q");
        assert_eq!(e.undo_stack().len(), 1);
    }

    #[test]
    fn clamp_after_shrink() {
        let mut e = editor("hello world", 0);
        e.set_selection(6, 11);
        e.set_text("hi");
        e.clamp();
        assert_eq!(e.selection(), (2, 2));
        assert_eq!(e.cursor(), 2);

        let mut e = editor("hello", 5);
        e.set_text("he");
        e.clamp();
        assert_eq!(e.cursor(), 2);
    }

    #[test]
    fn delete_selection_collapses_either_direction() {
        let mut e = editor("hello world", 0);
        e.set_selection(11, 5);
        e.delete_selection();
        assert_eq!(e.text(), "hello");
        assert_eq!(e.cursor(), 5);
        assert_eq!(e.selection(), (5, 5));
        e.undo();
        assert_eq!(e.text(), "hello world");
        assert_eq!(e.cursor(), 11);
    }

    #[test]
    fn paste_replaces_selection() {
        let mut e = editor("one two three", 0);
        e.set_selection(4, 7);
        assert!(e.paste("2"));
        assert_eq!(e.text(), "one 2 three");
        assert_eq!(e.cursor(), 5);
        e.undo();
        assert_eq!(e.text(), "one  three");
        e.undo();
        assert_eq!(e.text(), "one two three");
    }

    #[test]
    fn typing_and_insert_mode() {
        let mut e = editor("", 0);
        for ch in "abc".chars() {
            e.input_char(ch);
        }
        e.input_char('\n');
        assert_eq!(e.text(), "abc");
        assert_eq!(e.undo_stack().len(), 3);

        e.set_cursor(1);
        e.set_insert_mode(true);
        e.input_char('X');
        assert_eq!(e.text(), "aXc");
        assert_eq!(e.cursor(), 2);
        assert_eq!(e.undo_stack().peek().unwrap().kind, OperationType::Replace);

        e.set_cursor(3);
        e.input_char('d');
        assert_eq!(e.text(), "aXcd");

        e.input_newline();
        assert_eq!(e.text(), "aXcd\n");
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let mut e = TextEditor::with_text("a\r\nb");
        assert_eq!(e.text(), "a\nb");
        e.set_cursor(3);
        assert!(e.paste("\r\nc"));
        assert_eq!(e.text(), "a\nb\nc");
        assert_eq!(e.cursor(), 5);
    }

    #[test]
    fn input_filter_can_reject_or_rewrite() {
        let mut e = TextEditor::new();
        e.set_input_filter(|s| {
            if s.chars().all(|c| c.is_ascii_digit()) { Some(s.to_string()) } else { None }
        });
        assert!(e.set_text("123"));
        assert!(!e.set_text("12a"));
        assert_eq!(e.text(), "123");

        e.set_input_filter(|s| Some(s.to_uppercase()));
        e.set_text("abc");
        assert_eq!(e.text(), "ABC");
    }

    #[test]
    fn change_callbacks_distinguish_user_edits() {
        let all = Rc::new(RefCell::new(Vec::new()));
        let by_user = Rc::new(RefCell::new(Vec::new()));

        let mut e = TextEditor::new();
        let sink = Rc::clone(&all);
        e.set_on_text_changed(move |old, new| sink.borrow_mut().push((old.to_string(), new.to_string())));
        let sink = Rc::clone(&by_user);
        e.set_on_text_changed_by_user(move |_, new| sink.borrow_mut().push(new.to_string()));

        e.set_text("ab");
        e.set_cursor(2);
        e.input_char('c');

        assert_eq!(
            *all.borrow(),
            [("".to_string(), "ab".to_string()), ("ab".to_string(), "abc".to_string())]
        );
        assert_eq!(*by_user.borrow(), ["abc"]);
    }

    #[test]
    fn indices_are_characters() {
        let mut e = editor("héllo", 0);
        e.set_selection(1, 3);
        assert_eq!(e.selected_text(), "él");
        e.delete_selection();
        assert_eq!(e.text(), "hlo");
        e.insert_chars(1, "ë");
        assert_eq!(e.text(), "hëlo");
        e.undo();
        e.undo();
        assert_eq!(e.text(), "héllo");
    }

    #[test]
    fn replace_undo_keeps_cursor_then_clamps() {
        let mut e = editor("abcdef", 6);
        e.replace(0, 6, "xy");
        assert_eq!(e.cursor(), 2);
        e.undo();
        assert_eq!(e.text(), "abcdef");
        assert_eq!(e.cursor(), 2);
        e.set_cursor(6);
        e.redo();
        assert_eq!(e.text(), "xy");
        assert_eq!(e.cursor(), 2);
    }

    #[test]
    fn select_all_and_movement() {
        let mut e = editor("abc", 1);
        e.select_all();
        assert_eq!(e.selected_text(), "abc");
        e.move_left();
        assert_eq!(e.cursor(), 2);
        assert!(!e.has_selection());
        e.move_right();
        e.move_right();
        assert_eq!(e.cursor(), 3);
    }
}
