//! Parser, element tree, and writer for **Myra markup** (MML, `.xmmp`).
//!
//! MML is an XML-like format: element names are either property names of
//! the enclosing object or concrete widget type names, and attributes carry
//! simple property values. This crate knows nothing about widgets; it only
//! turns text into an [`Element`] tree and back. Interpretation happens in
//! the serializer in `myra-ui`.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Document`, `Element`, `Attribute` |
//! | [`error`] | `ParseError` |
//! | [`parser`] | `parse_str`, building the tree from `quick_xml` events |
//! | [`writer`] | indented output through `quick_xml::Writer` |
//!
//! # Quick start
//!
//! ```rust
//! use myra_mml::parse_str;
//!
//! let src = r#"
//!     <Project>
//!         <Window Title="Hello">
//!             <TextField Text="type here" />
//!         </Window>
//!     </Project>
//! "#;
//!
//! let doc = parse_str(src).unwrap();
//! assert_eq!(doc.root.name, "Project");
//! assert_eq!(doc.root.children[0].attribute("Title"), Some("Hello"));
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod writer;

pub use ast::{Attribute, Document, Element};
pub use error::ParseError;
pub use parser::parse_str;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) { parse_str(src).unwrap(); }
    fn err(src: &str) { parse_str(src).unwrap_err(); }

    #[test] fn empty_root() { ok("<Project />"); }
    #[test] fn root_with_end_tag() { ok("<Project></Project>"); }
    #[test] fn nested_widgets() {
        ok(r#"<Grid ColumnSpacing="8"><Label Text="a" GridColumn="1" /><TextField /></Grid>"#);
    }
    #[test] fn prolog_and_comments() {
        ok("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!-- top --><Project><!-- inner --></Project>");
    }
    #[test] fn single_quoted_values() { ok("<Label Text='it is' />"); }
    #[test] fn entity_in_value() { ok(r#"<Label Text="a &amp; b" />"#); }
    #[test] fn cdata_text() { ok("<Label><![CDATA[<raw>]]></Label>"); }
    #[test] fn proportions_block() {
        ok(r#"<Grid>
            <ColumnsProportions>
                <Proportion Type="Auto" />
                <Proportion Type="Fill" Value="1" />
            </ColumnsProportions>
        </Grid>"#);
    }
    #[test] fn err_mismatched_end() { err("<Grid></Window>"); }
    #[test] fn err_unclosed() { err("<Grid><Label />"); }
    #[test] fn err_duplicate_attribute() { err(r#"<Label Text="a" Text="b" />"#); }
    #[test] fn err_missing_equals() { err(r#"<Label Text "a" />"#); }
    #[test] fn err_unquoted_value() { err("<Label Text=a />"); }
    #[test] fn err_two_roots() { err("<A /><B />"); }
    #[test] fn err_empty_document() { err("   "); }
    #[test] fn err_text_before_root() { err("hello <A />"); }

    #[test]
    fn text_content_is_kept() {
        let doc = parse_str("<Label>  hello  </Label>").unwrap();
        assert_eq!(doc.root.text.as_deref(), Some("  hello  "));
    }

    #[test]
    fn write_then_parse_preserves_tree() {
        let src = r#"<Project><Window Title="T"><Grid><Label Text="x" /></Grid></Window></Project>"#;
        let doc = parse_str(src).unwrap();
        let again = parse_str(&doc.to_string()).unwrap();
        assert_eq!(doc, again);
    }
}
