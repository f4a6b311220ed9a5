//! Typed stylesheet model.
//!
//! Declarations are closed enums rather than free-form CSS so the cascade can
//! compute concrete values for layout, while `to_css` still produces the text
//! written next to the export document.

use std::fmt::Write as _;

use serde::Serialize;

use crate::layout::page::PageSetup;
use crate::preview::tree::{Element, Tag};
use crate::style::palette::Rgb;

// ────────────────────────────────────────────────────────────────────────────
// Property values
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Display {
    Block,
    Flex,
    InlineFlex,
    Grid,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Position {
    Static,
    Sticky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overflow {
    Visible,
    Hidden,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakInside {
    Auto,
    Avoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sides {
    All,
    X,
    Y,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GradientDirection {
    ToRight,
    ToBottomRight,
}

impl GradientDirection {
    fn css(&self) -> &'static str {
        match self {
            GradientDirection::ToRight => "to right",
            GradientDirection::ToBottomRight => "to bottom right",
        }
    }
}

/// One property assignment. Lengths are CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    Display(Display),
    Position(Position),
    Overflow(Overflow),
    BreakInside(BreakInside),
    FlexWrap,
    JustifyBetween,
    Color(Rgb),
    TransparentText,
    Background(Rgb),
    Gradient(GradientDirection),
    GradientFrom(Rgb),
    GradientTo(Rgb),
    ClipText,
    FontSize { size: f32, line_height: f32 },
    FontWeight(u16),
    LetterSpacing(f32),
    LineHeight(f32),
    Uppercase,
    Underline,
    NoWrap,
    Padding(Sides, f32),
    MarginTop(f32),
    Gap { row: Option<f32>, column: Option<f32> },
    BorderWidth(Sides, f32),
    BorderColor(Rgb),
    Radius(f32),
    Height(f32),
    Shadow,
    PrintColorExact,
}

fn sides_css(prefix: &str, sides: Sides, value: f32, suffix: &str, out: &mut Vec<String>) {
    let names: &[&str] = match sides {
        Sides::All => &[""],
        Sides::X => &["-left", "-right"],
        Sides::Y => &["-top", "-bottom"],
        Sides::Top => &["-top"],
        Sides::Bottom => &["-bottom"],
    };
    for name in names {
        out.push(format!("{prefix}{name}{suffix}: {}px", fmt_px(value)));
    }
}

fn fmt_px(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl Declaration {
    /// CSS property lines for this declaration (without trailing `;`).
    pub fn css_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        match self {
            Declaration::Display(d) => out.push(
                match d {
                    Display::Block => "display: block",
                    Display::Flex => "display: flex",
                    Display::InlineFlex => "display: inline-flex",
                    Display::Grid => "display: grid",
                    Display::None => "display: none",
                }
                .to_string(),
            ),
            Declaration::Position(p) => {
                out.push(
                    match p {
                        Position::Static => "position: static",
                        Position::Sticky => "position: sticky",
                    }
                    .to_string(),
                );
                if *p == Position::Static {
                    out.push("top: auto".to_string());
                }
            }
            Declaration::Overflow(o) => out.push(
                match o {
                    Overflow::Visible => "overflow: visible",
                    Overflow::Hidden => "overflow: hidden",
                    Overflow::Auto => "overflow: auto",
                }
                .to_string(),
            ),
            Declaration::BreakInside(b) => {
                let (modern, legacy) = match b {
                    BreakInside::Auto => ("auto", "auto"),
                    BreakInside::Avoid => ("avoid-page", "avoid"),
                };
                out.push(format!("break-inside: {modern}"));
                out.push(format!("page-break-inside: {legacy}"));
            }
            Declaration::FlexWrap => out.push("flex-wrap: wrap".to_string()),
            Declaration::JustifyBetween => out.push("justify-content: space-between".to_string()),
            Declaration::Color(c) => out.push(format!("color: {c}")),
            Declaration::TransparentText => out.push("color: transparent".to_string()),
            Declaration::Background(c) => out.push(format!("background-color: {c}")),
            Declaration::Gradient(dir) => out.push(format!(
                "background-image: linear-gradient({}, var(--gradient-from, transparent), var(--gradient-to, transparent))",
                dir.css()
            )),
            Declaration::GradientFrom(c) => out.push(format!("--gradient-from: {c}")),
            Declaration::GradientTo(c) => out.push(format!("--gradient-to: {c}")),
            Declaration::ClipText => {
                out.push("-webkit-background-clip: text".to_string());
                out.push("background-clip: text".to_string());
            }
            Declaration::FontSize { size, line_height } => {
                out.push(format!("font-size: {}px", fmt_px(*size)));
                out.push(format!("line-height: {}px", fmt_px(*line_height)));
            }
            Declaration::FontWeight(w) => out.push(format!("font-weight: {w}")),
            Declaration::LetterSpacing(em) => out.push(format!("letter-spacing: {em}em")),
            Declaration::LineHeight(px) => out.push(format!("line-height: {}px", fmt_px(*px))),
            Declaration::Uppercase => out.push("text-transform: uppercase".to_string()),
            Declaration::Underline => out.push("text-decoration: underline".to_string()),
            Declaration::NoWrap => out.push("white-space: nowrap".to_string()),
            Declaration::Padding(sides, v) => sides_css("padding", *sides, *v, "", &mut out),
            Declaration::MarginTop(v) => out.push(format!("margin-top: {}px", fmt_px(*v))),
            Declaration::Gap { row, column } => {
                if let Some(r) = row {
                    out.push(format!("row-gap: {}px", fmt_px(*r)));
                }
                if let Some(c) = column {
                    out.push(format!("column-gap: {}px", fmt_px(*c)));
                }
            }
            Declaration::BorderWidth(sides, v) => {
                sides_css("border", *sides, *v, "-width", &mut out);
                out.push("border-style: solid".to_string());
            }
            Declaration::BorderColor(c) => out.push(format!("border-color: {c}")),
            Declaration::Radius(v) => out.push(format!("border-radius: {}px", fmt_px(*v))),
            Declaration::Height(v) => out.push(format!("height: {}px", fmt_px(*v))),
            Declaration::Shadow => {
                out.push("box-shadow: 0 10px 15px -3px rgb(0 0 0 / 0.1)".to_string())
            }
            Declaration::PrintColorExact => {
                out.push("-webkit-print-color-adjust: exact".to_string());
                out.push("print-color-adjust: exact".to_string());
            }
        }
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selectors & rules
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Selector {
    Tag(Tag),
    Id(String),
    Class(String),
    /// `[class*="..."]`
    ClassContains(String),
    /// `[name]` or `[name="value"]`, optionally restricted to a tag.
    Attr {
        tag: Option<Tag>,
        name: String,
        value: Option<String>,
    },
}

impl Selector {
    pub fn matches(&self, el: &Element) -> bool {
        match self {
            Selector::Tag(tag) => el.tag == *tag,
            Selector::Id(id) => el.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => el.has_class(class),
            Selector::ClassContains(fragment) => {
                el.classes.iter().any(|c| c.contains(fragment.as_str()))
            }
            Selector::Attr { tag, name, value } => {
                if tag.is_some_and(|t| t != el.tag) {
                    return false;
                }
                match (el.get_attr(name), value) {
                    (Some(actual), Some(expected)) => actual == expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            }
        }
    }

    pub fn to_css(&self) -> String {
        match self {
            Selector::Tag(tag) => tag.as_str().to_string(),
            Selector::Id(id) => format!("#{id}"),
            Selector::Class(class) => format!(".{}", escape_class(class)),
            Selector::ClassContains(fragment) => format!("[class*=\"{fragment}\"]"),
            Selector::Attr { tag, name, value } => {
                let tag = tag.map(|t| t.as_str()).unwrap_or("");
                match value {
                    Some(v) => format!("{tag}[{name}=\"{v}\"]"),
                    None => format!("{tag}[{name}]"),
                }
            }
        }
    }
}

/// Escapes characters that are not valid in a bare CSS class selector.
pub fn escape_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len());
    for (i, c) in class.chars().enumerate() {
        let plain = c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if !plain || (i == 0 && c.is_ascii_digit()) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    pub fn new(selectors: Vec<Selector>, declarations: Vec<Declaration>) -> Self {
        Rule {
            selectors,
            declarations,
        }
    }

    pub fn matches(&self, el: &Element) -> bool {
        self.selectors.iter().any(|s| s.matches(el))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stylesheet {
    pub name: String,
    /// Every declaration is emitted `!important` (print overrides).
    pub important: bool,
    pub page: Option<PageSetup>,
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new(name: impl Into<String>) -> Self {
        Stylesheet {
            name: name.into(),
            important: false,
            page: None,
            rules: Vec::new(),
        }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Declarations of every rule matching `el`, in sheet order.
    pub fn matching<'a>(&'a self, el: &'a Element) -> impl Iterator<Item = &'a Declaration> {
        self.rules
            .iter()
            .filter(move |r| r.matches(el))
            .flat_map(|r| r.declarations.iter())
    }

    pub fn to_css(&self) -> String {
        let mut css = String::new();
        if let Some(page) = &self.page {
            let _ = writeln!(
                css,
                "@page {{ size: {}; margin: {}mm {}mm {}mm {}mm; }}",
                page.size_name(),
                fmt_px(page.margin_top_mm),
                fmt_px(page.margin_right_mm),
                fmt_px(page.margin_bottom_mm),
                fmt_px(page.margin_left_mm),
            );
        }
        let bang = if self.important { " !important" } else { "" };
        for rule in &self.rules {
            let selectors: Vec<String> = rule.selectors.iter().map(Selector::to_css).collect();
            let _ = writeln!(css, "{} {{", selectors.join(", "));
            for decl in &rule.declarations {
                for line in decl.css_lines() {
                    let _ = writeln!(css, "  {line}{bang};");
                }
            }
            css.push_str("}\n");
        }
        css
    }
}
