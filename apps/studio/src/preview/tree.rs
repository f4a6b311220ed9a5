//! Visual tree: the element structure the preview renders and export clones.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::style::sheet::Declaration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Div,
    Header,
    Main,
    Section,
    H1,
    H2,
    H3,
    H4,
    P,
    Span,
    A,
    Button,
    Li,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Header => "header",
            Tag::Main => "main",
            Tag::Section => "section",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::P => "p",
            Tag::Span => "span",
            Tag::A => "a",
            Tag::Button => "button",
            Tag::Li => "li",
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VisualNode {
    Element(Element),
    Text(String),
}

impl From<Element> for VisualNode {
    fn from(el: Element) -> Self {
        VisualNode::Element(el)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: Tag,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub inline_style: Vec<Declaration>,
    pub children: Vec<VisualNode>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Element {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            inline_style: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Appends whitespace-separated class tokens.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, node: impl Into<VisualNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VisualNode>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(VisualNode::Text(text.into()));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            VisualNode::Element(el) => Some(el),
            VisualNode::Text(_) => None,
        })
    }

    /// Pre-order traversal over this element and all descendant elements.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        f(self);
        for child in self.child_elements() {
            child.walk(f);
        }
    }

    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let VisualNode::Element(el) = child {
                el.walk_mut(f);
            }
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find_by_id(id))
    }

    pub fn find_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |el| {
            if predicate(el) {
                found.push(el);
            }
        });
        found
    }

    /// Concatenated text of the subtree, with single spaces between runs.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        collect_text(self, &mut parts);
        parts.join(" ")
    }
}

fn collect_text<'a>(el: &'a Element, out: &mut Vec<&'a str>) {
    for child in &el.children {
        match child {
            VisualNode::Text(t) if !t.trim().is_empty() => out.push(t.trim()),
            VisualNode::Text(_) => {}
            VisualNode::Element(c) => collect_text(c, out),
        }
    }
}

/// Id of the preview root, the anchor the export pipeline clones.
pub const PREVIEW_ANCHOR_ID: &str = "resume-preview";

/// Rendered preview of one resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualTree {
    root: Element,
}

impl VisualTree {
    pub fn new(root: Element) -> Self {
        VisualTree { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    /// The `section` tagged `data-section="<key>"`, if rendered.
    pub fn section(&self, key: &str) -> Option<&Element> {
        self.root
            .find_all(|el| el.tag == Tag::Section && el.get_attr("data-section") == Some(key))
            .into_iter()
            .next()
    }

    pub fn section_keys(&self) -> Vec<&str> {
        self.root
            .find_all(|el| el.tag == Tag::Section)
            .into_iter()
            .filter_map(|el| el.get_attr("data-section"))
            .collect()
    }

    /// Entity cards (elements tagged with `data-entity-id`) inside `section`.
    pub fn entities_in<'a>(section: &'a Element) -> Vec<&'a Element> {
        section.find_all(|el| el.get_attr("data-entity-id").is_some())
    }

    pub fn has_verified_badge(entity: &Element) -> bool {
        !entity
            .find_all(|el| el.get_attr("data-badge") == Some("verified"))
            .is_empty()
    }

    /// Entry and verified-badge counts of every rendered section, in order.
    pub fn outline(&self) -> Vec<SectionOutline<'_>> {
        self.section_keys()
            .into_iter()
            .filter_map(|key| {
                let entities = Self::entities_in(self.section(key)?);
                Some(SectionOutline {
                    key,
                    entries: entities.len(),
                    verified: entities.iter().filter(|e| Self::has_verified_badge(e)).count(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionOutline<'a> {
    pub key: &'a str,
    pub entries: usize,
    pub verified: usize,
}
