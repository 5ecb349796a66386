use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::ast::{Attribute, Document, Element};
use crate::error::ParseError;

// ── Parser ────────────────────────────────────────────────────────────────

/// Builds an [`Element`] tree from `quick_xml` events.
///
/// Rejects what the reader tolerates on its own: content outside the single
/// root element, and elements left open at the end of input.
struct Parser<'s> {
    src: &'s str,
    reader: Reader<&'s [u8]>,
    stack: Vec<Element>,
    root: Option<Element>,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        let mut reader = Reader::from_str(src);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = true;
        Self { src, reader, stack: Vec::new(), root: None }
    }

    /// 1-based line and column of byte `offset` in the source.
    fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.src.len());
        let before = self.src.get(..offset).unwrap_or(self.src);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = before[line_start..].chars().count() + 1;
        (line, col)
    }

    fn err_at(&self, offset: usize, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.line_col(offset);
        ParseError::new(msg, line, col)
    }

    // ── Document ──────────────────────────────────────────────────────────

    fn parse_document(mut self) -> Result<Document, ParseError> {
        loop {
            let start = self.reader.buffer_position() as usize;
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let at = self.reader.error_position() as usize;
                    return Err(self.err_at(at, e.to_string()));
                }
            };

            match event {
                Event::Start(tag) => {
                    let element = self.element(&tag, start)?;
                    self.stack.push(element);
                }
                Event::Empty(tag) => {
                    let element = self.element(&tag, start)?;
                    self.attach(element);
                }
                Event::End(_) => {
                    if let Some(element) = self.stack.pop() {
                        self.attach(element);
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| self.err_at(start, e.to_string()))?;
                    self.text(&text, start)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    self.text(&text, start)?;
                }
                Event::Eof => break,
                // Prolog, comments, processing instructions, doctype.
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(self.err_at(self.src.len(), format!("unclosed element <{}>", open.name)));
        }
        match self.root {
            Some(root) => Ok(Document { root }),
            None => Err(self.err_at(self.src.len(), "document has no root element")),
        }
    }

    // ── Element ───────────────────────────────────────────────────────────

    /// Converts a start or empty tag beginning at byte `start`.
    fn element(&self, tag: &BytesStart<'_>, start: usize) -> Result<Element, ParseError> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        if self.stack.is_empty() && self.root.is_some() {
            return Err(self.err_at(start, format!("unexpected <{name}> after the root element")));
        }

        let mut element = Element::new(name);
        for attr in tag.attributes() {
            let attr = attr.map_err(|e| self.err_at(start, format!("in <{}>: {e}", element.name)))?;
            let value = attr.unescape_value().map_err(|e| self.err_at(start, e.to_string()))?;
            element.attributes.push(Attribute {
                name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value: value.into_owned(),
            });
        }
        Ok(element)
    }

    fn attach(&mut self, element: Element) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.root = Some(element),
        }
    }

    /// Appends character data to the open element. Whitespace-only runs are
    /// dropped; anything else outside an element is an error.
    fn text(&mut self, text: &str, start: usize) -> Result<(), ParseError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        match self.stack.last_mut() {
            Some(parent) => {
                parent.text.get_or_insert_with(String::new).push_str(text);
                Ok(())
            }
            None => Err(self.err_at(start, "text outside the root element")),
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse MML source into a [`Document`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    Parser::new(src).parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_source_order() {
        let doc = parse_str(r#"<Label Text="a" Id="b" GridColumn="2" />"#).unwrap();
        let names: Vec<&str> = doc.root.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Text", "Id", "GridColumn"]);
    }

    #[test]
    fn entities_decoded() {
        let doc = parse_str(r#"<Label Text="&lt;a&gt; &amp; &quot;b&quot; &#65;&#x42;" />"#).unwrap();
        assert_eq!(doc.root.attribute("Text"), Some(r#"<a> & "b" AB"#));
    }

    #[test]
    fn unknown_entity_is_error() {
        assert!(parse_str(r#"<Label Text="&bogus;" />"#).is_err());
    }

    #[test]
    fn whitespace_between_children_is_ignored() {
        let doc = parse_str("<Grid>\n  <Label />\n  <Label />\n</Grid>").unwrap();
        assert_eq!(doc.root.children.len(), 2);
        assert_eq!(doc.root.text, None);
    }

    #[test]
    fn error_position_tracks_lines() {
        let err = parse_str("<Project>\n  <Window>\n  </Grid>\n</Project>").unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn unclosed_element_names_the_tag() {
        let err = parse_str("<Grid><Label />").unwrap_err();
        assert!(err.message.contains("Grid"), "{err}");
    }
}
