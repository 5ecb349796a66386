use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::ast::Element;

/// Writes `element` and its subtree as two-space indented markup.
pub fn write_element(element: &Element) -> String {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_into(&mut writer, element);
    String::from_utf8(writer.into_inner()).unwrap_or_default()
}

// Writing into a Vec cannot fail, so event results are ignored.
fn write_into<W: Write>(writer: &mut Writer<W>, element: &Element) {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        let _ = writer.write_event(Event::Empty(start));
        return;
    }

    let _ = writer.write_event(Event::Start(start));
    if let Some(text) = &element.text {
        let _ = writer.write_event(Event::Text(BytesText::new(text)));
    }
    for child in &element.children {
        write_into(writer, child);
    }
    let _ = writer.write_event(Event::End(BytesEnd::new(element.name.as_str())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    #[test]
    fn empty_element_is_self_closing() {
        assert_eq!(write_element(&Element::new("Grid")), "<Grid/>");
    }

    #[test]
    fn nested_elements_are_indented() {
        let el = Element::new("Project")
            .with_child(Element::new("Window").with_attribute("Title", "Main"));
        assert_eq!(write_element(&el), "<Project>\n  <Window Title=\"Main\"/>\n</Project>");
    }

    #[test]
    fn attribute_escapes_survive_reparse() {
        let el = Element::new("TextField").with_attribute("Text", "a \"b\" <c> & 'd'");
        let doc = parse_str(&write_element(&el)).unwrap();
        assert_eq!(doc.root.attribute("Text"), Some("a \"b\" <c> & 'd'"));
    }

    #[test]
    fn text_content_is_escaped() {
        let mut el = Element::new("Label");
        el.text = Some("1 < 2".into());
        assert_eq!(write_element(&el), "<Label>1 &lt; 2</Label>");
    }
}
