//! HTML serialisation of the visual tree.

use std::fmt::Write as _;

use crate::preview::tree::{Element, VisualNode};

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

pub fn to_html(el: &Element) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

fn write_element(el: &Element, out: &mut String) {
    let tag = el.tag.as_str();
    out.push('<');
    out.push_str(tag);
    if let Some(id) = &el.id {
        let _ = write!(out, " id=\"{}\"", escape_attr(id));
    }
    if !el.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape_attr(&el.classes.join(" ")));
    }
    for (name, value) in &el.attrs {
        let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
    }
    if !el.inline_style.is_empty() {
        let css: Vec<String> = el
            .inline_style
            .iter()
            .flat_map(|d| d.css_lines())
            .collect();
        let _ = write!(out, " style=\"{}\"", escape_attr(&css.join("; ")));
    }
    out.push('>');
    for child in &el.children {
        match child {
            VisualNode::Element(c) => write_element(c, out),
            VisualNode::Text(t) => out.push_str(&escape_text(t)),
        }
    }
    let _ = write!(out, "</{tag}>");
}

/// Standalone document around `body`, with a `<base>` and linked sheets.
pub fn document_shell(title: &str, base_href: &str, stylesheets: &[&str], body: &str) -> String {
    let mut out = String::from("<!doctype html>\n<html>\n  <head>\n    <meta charset=\"utf-8\" />\n");
    let _ = writeln!(out, "    <title>{}</title>", escape_text(title));
    let _ = writeln!(out, "    <base href=\"{}\">", escape_attr(base_href));
    for href in stylesheets {
        let _ = writeln!(
            out,
            "    <link rel=\"stylesheet\" href=\"{}\">",
            escape_attr(href)
        );
    }
    out.push_str("  </head>\n  <body>\n");
    out.push_str(body);
    out.push_str("\n  </body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::tree::Tag;

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let el = Element::new(Tag::A)
            .attr("href", "https://x.dev/?a=1&b=\"2\"")
            .text("<Tom & Jerry>");
        assert_eq!(
            to_html(&el),
            "<a href=\"https://x.dev/?a=1&amp;b=&quot;2&quot;\">&lt;Tom &amp; Jerry&gt;</a>"
        );
    }

    #[test]
    fn test_nested_elements_and_classes() {
        let el = Element::new(Tag::Div)
            .with_id("root")
            .class("p-4 text-sm")
            .child(Element::new(Tag::P).text("hi"));
        assert_eq!(
            to_html(&el),
            "<div id=\"root\" class=\"p-4 text-sm\"><p>hi</p></div>"
        );
    }

    #[test]
    fn test_shell_links_stylesheets_in_order() {
        let html = document_shell("", "http://localhost:5173/", &["app.css", "print.css"], "<div></div>");
        let app = html.find("app.css").unwrap();
        let print = html.find("print.css").unwrap();
        assert!(app < print);
        assert!(html.contains("<base href=\"http://localhost:5173/\">"));
    }
}
