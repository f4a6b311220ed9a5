//! Cascade: class tokens, layered stylesheets and inline declarations folded
//! into one computed style per element.
//!
//! Order of application (later wins): inherited values from the parent, the
//! element's utility classes in attribute order, each extra stylesheet in the
//! order given (the print sheet is passed last), then inline declarations.

use serde::Serialize;

use crate::preview::tree::{Element, Tag, VisualNode};
use crate::style::palette::Rgb;
use crate::style::sheet::{BreakInside, Declaration, Display, Overflow, Position, Sides, Stylesheet};
use crate::style::utility;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    fn set(&mut self, sides: Sides, value: f32) {
        match sides {
            Sides::All => {
                self.top = value;
                self.right = value;
                self.bottom = value;
                self.left = value;
            }
            Sides::X => {
                self.left = value;
                self.right = value;
            }
            Sides::Y => {
                self.top = value;
                self.bottom = value;
            }
            Sides::Top => self.top = value,
            Sides::Bottom => self.bottom = value,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        self.horizontal() == 0.0 && self.vertical() == 0.0
    }
}

/// Fully resolved style of one element. Lengths are CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    // inherited
    pub color: Rgb,
    pub font_size: f32,
    pub line_height: f32,
    pub font_weight: u16,
    pub letter_spacing_em: f32,
    pub uppercase: bool,
    pub underline: bool,
    pub nowrap: bool,
    // not inherited
    pub display: Display,
    pub position: Position,
    pub overflow: Overflow,
    pub break_inside: BreakInside,
    pub flex_wrap: bool,
    pub justify_between: bool,
    pub background: Option<Rgb>,
    pub padding: Edges,
    pub margin_top: f32,
    pub row_gap: f32,
    pub column_gap: f32,
    pub border: Edges,
    pub border_color: Rgb,
    pub radius: f32,
    pub height: Option<f32>,
}

const DEFAULT_TEXT: Rgb = Rgb::hex(0x0f172a);
const DEFAULT_BORDER: Rgb = Rgb::hex(0xe5e7eb);

impl Default for ComputedStyle {
    fn default() -> Self {
        ComputedStyle {
            color: DEFAULT_TEXT,
            font_size: 16.0,
            line_height: 24.0,
            font_weight: 400,
            letter_spacing_em: 0.0,
            uppercase: false,
            underline: false,
            nowrap: false,
            display: Display::Block,
            position: Position::Static,
            overflow: Overflow::Visible,
            break_inside: BreakInside::Auto,
            flex_wrap: false,
            justify_between: false,
            background: None,
            padding: Edges::default(),
            margin_top: 0.0,
            row_gap: 0.0,
            column_gap: 0.0,
            border: Edges::default(),
            border_color: DEFAULT_BORDER,
            radius: 0.0,
            height: None,
        }
    }
}

impl ComputedStyle {
    /// Inherited properties of `parent`, everything else at initial values.
    fn inherit(parent: &ComputedStyle) -> Self {
        ComputedStyle {
            color: parent.color,
            font_size: parent.font_size,
            line_height: parent.line_height,
            font_weight: parent.font_weight,
            letter_spacing_em: parent.letter_spacing_em,
            uppercase: parent.uppercase,
            underline: parent.underline,
            nowrap: parent.nowrap,
            ..ComputedStyle::default()
        }
    }

    pub fn is_row(&self) -> bool {
        matches!(self.display, Display::Flex | Display::InlineFlex)
    }
}

/// Tracks the gradient/clip-text combination until every declaration is in.
struct Builder {
    style: ComputedStyle,
    transparent_text: bool,
    clip_text: bool,
    gradient: bool,
    gradient_from: Option<Rgb>,
    gradient_to: Option<Rgb>,
}

impl Builder {
    fn new(parent: &ComputedStyle) -> Self {
        Builder {
            style: ComputedStyle::inherit(parent),
            transparent_text: false,
            clip_text: false,
            gradient: false,
            gradient_from: None,
            gradient_to: None,
        }
    }

    fn apply(&mut self, decl: &Declaration) {
        let s = &mut self.style;
        match decl {
            Declaration::Display(d) => s.display = *d,
            Declaration::Position(p) => s.position = *p,
            Declaration::Overflow(o) => s.overflow = *o,
            Declaration::BreakInside(b) => s.break_inside = *b,
            Declaration::FlexWrap => s.flex_wrap = true,
            Declaration::JustifyBetween => s.justify_between = true,
            Declaration::Color(c) => {
                s.color = *c;
                self.transparent_text = false;
            }
            Declaration::TransparentText => self.transparent_text = true,
            Declaration::Background(c) => {
                s.background = Some(*c);
                self.gradient = false;
            }
            Declaration::Gradient(_) => self.gradient = true,
            Declaration::GradientFrom(c) => self.gradient_from = Some(*c),
            Declaration::GradientTo(c) => self.gradient_to = Some(*c),
            Declaration::ClipText => self.clip_text = true,
            Declaration::FontSize { size, line_height } => {
                s.font_size = *size;
                s.line_height = *line_height;
            }
            Declaration::FontWeight(w) => s.font_weight = *w,
            Declaration::LetterSpacing(em) => s.letter_spacing_em = *em,
            Declaration::LineHeight(px) => s.line_height = *px,
            Declaration::Uppercase => s.uppercase = true,
            Declaration::Underline => s.underline = true,
            Declaration::NoWrap => s.nowrap = true,
            Declaration::Padding(sides, v) => s.padding.set(*sides, *v),
            Declaration::MarginTop(v) => s.margin_top = *v,
            Declaration::Gap { row, column } => {
                if let Some(r) = row {
                    s.row_gap = *r;
                }
                if let Some(c) = column {
                    s.column_gap = *c;
                }
            }
            Declaration::BorderWidth(sides, v) => s.border.set(*sides, *v),
            Declaration::BorderColor(c) => s.border_color = *c,
            Declaration::Radius(v) => s.radius = *v,
            Declaration::Height(v) => s.height = Some(*v),
            // Not printed.
            Declaration::Shadow | Declaration::PrintColorExact => {}
        }
    }

    fn finish(mut self) -> ComputedStyle {
        // A gradient is painted with its first stop (falling back to the last).
        let gradient_paint = self.gradient_from.or(self.gradient_to);
        if self.clip_text {
            // Gradient clipped to the glyphs: the text takes the gradient colour
            // and there is no box background.
            if let (true, Some(paint)) = (self.transparent_text, gradient_paint) {
                self.style.color = paint;
            }
            self.style.background = None;
        } else if self.gradient {
            if let Some(paint) = gradient_paint {
                self.style.background = Some(paint);
            }
        }
        self.style
    }
}

pub fn compute_style(el: &Element, parent: &ComputedStyle, sheets: &[&Stylesheet]) -> ComputedStyle {
    let mut builder = Builder::new(parent);
    for class in &el.classes {
        for decl in utility::declarations(class) {
            builder.apply(&decl);
        }
    }
    for sheet in sheets {
        for decl in sheet.matching(el) {
            builder.apply(decl);
        }
    }
    for decl in &el.inline_style {
        builder.apply(decl);
    }
    builder.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Styled tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StyledContent {
    Children(Vec<StyledNode>),
    Text(String),
}

/// Element or text run with its computed style. Text runs carry the style of
/// the element that contains them. Elements computed as `display: none` are
/// dropped together with their subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledNode {
    pub tag: Option<Tag>,
    pub href: Option<String>,
    pub style: ComputedStyle,
    pub content: StyledContent,
}

impl StyledNode {
    pub fn children(&self) -> &[StyledNode] {
        match &self.content {
            StyledContent::Children(children) => children,
            StyledContent::Text(_) => &[],
        }
    }
}

pub fn style_tree(root: &Element, sheets: &[&Stylesheet]) -> Option<StyledNode> {
    style_element(root, &ComputedStyle::default(), sheets)
}

fn style_element(el: &Element, parent: &ComputedStyle, sheets: &[&Stylesheet]) -> Option<StyledNode> {
    let style = compute_style(el, parent, sheets);
    if style.display == Display::None {
        return None;
    }

    let children = el
        .children
        .iter()
        .filter_map(|child| match child {
            VisualNode::Element(child) => style_element(child, &style, sheets),
            VisualNode::Text(text) if !text.trim().is_empty() => Some(StyledNode {
                tag: None,
                href: None,
                style: ComputedStyle::inherit(&style),
                content: StyledContent::Text(text.clone()),
            }),
            VisualNode::Text(_) => None,
        })
        .collect();

    Some(StyledNode {
        tag: Some(el.tag),
        href: (el.tag == Tag::A)
            .then(|| el.get_attr("href").map(str::to_string))
            .flatten(),
        style,
        content: StyledContent::Children(children),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::sheet::{Rule, Selector};

    fn print_like_sheet() -> Stylesheet {
        let mut sheet = Stylesheet::new("print");
        sheet.push(Rule::new(
            vec![Selector::Class("sticky".into())],
            vec![Declaration::Position(Position::Static)],
        ));
        sheet.push(Rule::new(
            vec![Selector::Tag(Tag::Button)],
            vec![Declaration::Display(Display::None)],
        ));
        sheet
    }

    #[test]
    fn test_inherited_properties_flow_to_children() {
        let root = Element::new(Tag::Div)
            .class("text-sm text-slate-600 p-4")
            .child(Element::new(Tag::P).text("hello"));
        let styled = style_tree(&root, &[]).unwrap();
        let p = &styled.children()[0];
        assert_eq!(p.style.font_size, 14.0);
        assert_eq!(p.style.color, Rgb::hex(0x475569));
        // padding is not inherited
        assert!(p.style.padding.is_zero());
    }

    #[test]
    fn test_later_sheet_overrides_classes() {
        let root = Element::new(Tag::Header).class("sticky top-0");
        let sheet = print_like_sheet();
        assert_eq!(
            style_tree(&root, &[]).unwrap().style.position,
            Position::Sticky
        );
        assert_eq!(
            style_tree(&root, &[&sheet]).unwrap().style.position,
            Position::Static
        );
    }

    #[test]
    fn test_display_none_drops_subtree() {
        let root = Element::new(Tag::Div)
            .child(Element::new(Tag::Button).text("Download PDF"))
            .child(Element::new(Tag::P).text("kept"));
        let sheet = print_like_sheet();
        let styled = style_tree(&root, &[&sheet]).unwrap();
        assert_eq!(styled.children().len(), 1);
        assert_eq!(styled.children()[0].tag, Some(Tag::P));
    }

    #[test]
    fn test_clip_text_gradient_colours_the_glyphs() {
        let root = Element::new(Tag::H1).class(
            "bg-gradient-to-r from-indigo-600 to-purple-600 bg-clip-text text-transparent",
        );
        let style = style_tree(&root, &[]).unwrap().style;
        assert_eq!(style.color, Rgb::hex(0x4f46e5));
        assert_eq!(style.background, None);
    }

    #[test]
    fn test_gradient_background_uses_first_stop() {
        let root = Element::new(Tag::Div).class("bg-gradient-to-br from-indigo-50 via-white to-purple-50");
        let style = style_tree(&root, &[]).unwrap().style;
        assert_eq!(style.background, Some(Rgb::hex(0xeef2ff)));
    }

    #[test]
    fn test_inline_declarations_win() {
        let mut root = Element::new(Tag::Div).class("bg-slate-50");
        root.inline_style.push(Declaration::Background(Rgb::WHITE));
        let style = style_tree(&root, &[]).unwrap().style;
        assert_eq!(style.background, Some(Rgb::WHITE));
    }

    #[test]
    fn test_anchor_href_is_carried() {
        let root = Element::new(Tag::A).attr("href", "https://x.dev").text("X");
        let styled = style_tree(&root, &[]).unwrap();
        assert_eq!(styled.href.as_deref(), Some("https://x.dev"));
    }
}
