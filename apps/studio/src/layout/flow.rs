//! Continuous (unpaginated) layout of a styled tree.
//!
//! Produces a tree of `LayoutBox`es in CSS pixels, y growing downwards from
//! the top of the flow. Supports exactly what the preview uses: block
//! stacking, grid rows with a gap, single-line flex rows (optionally
//! `justify-between`) and wrapping flex rows. Paginating the result is the
//! job of `paginate`.

use serde::Serialize;

use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::preview::tree::Tag;
use crate::style::cascade::{ComputedStyle, Edges, StyledContent, StyledNode};
use crate::style::palette::Rgb;
use crate::style::sheet::{BreakInside, Display, Overflow};

// ────────────────────────────────────────────────────────────────────────────
// Display list
// ────────────────────────────────────────────────────────────────────────────

/// One line of text. `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub line_height: f32,
    pub size: f32,
    pub face: FontFace,
    pub color: Rgb,
    pub tracking_em: f32,
    pub underline: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Paint {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        border: Edges,
        border_color: Rgb,
        radius: f32,
    },
    Text(TextRun),
    Link {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        href: String,
    },
}

impl Paint {
    pub fn top(&self) -> f32 {
        match self {
            Paint::Rect { y, .. } | Paint::Link { y, .. } => *y,
            Paint::Text(run) => run.y,
        }
    }

    /// Copy moved vertically by `dy`.
    pub fn shifted(&self, dy: f32) -> Paint {
        let mut paint = self.clone();
        match &mut paint {
            Paint::Rect { y, .. } | Paint::Link { y, .. } => *y += dy,
            Paint::Text(run) => run.y += dy,
        }
        paint
    }
}

/// Background and border of a box. Positioned by the paginator, which may
/// stretch it across pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decor {
    pub fill: Option<Rgb>,
    pub border: Edges,
    pub border_color: Rgb,
    pub radius: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout boxes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox {
    pub tag: Option<Tag>,
    pub x: f32,
    pub width: f32,
    pub top: f32,
    pub height: f32,
    pub decor: Option<Decor>,
    /// Text and link paints of this box itself (line boxes only).
    pub content: Vec<Paint>,
    pub children: Vec<LayoutBox>,
    /// Must not be split across pages if it fits on one.
    pub keep_together: bool,
    /// Must start on the same page as the leading unit of the next sibling.
    pub keep_with_next: bool,
    /// Children stack vertically, so the box may be split between them.
    pub stacked: bool,
}

impl LayoutBox {
    fn new(tag: Option<Tag>, x: f32, width: f32, top: f32) -> Self {
        LayoutBox {
            tag,
            x,
            width,
            top,
            height: 0.0,
            decor: None,
            content: Vec::new(),
            children: Vec::new(),
            keep_together: false,
            keep_with_next: false,
            stacked: true,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn can_split(&self) -> bool {
        self.stacked && !self.children.is_empty()
    }

    /// Pre-order iterator over every paint of the subtree, decor excluded.
    pub fn for_each_paint(&self, f: &mut impl FnMut(&Paint)) {
        for paint in &self.content {
            f(paint);
        }
        for child in &self.children {
            child.for_each_paint(f);
        }
    }

    /// Drops every descendant that starts at or below `limit`.
    fn clip_below(&mut self, limit: f32) {
        self.children.retain(|c| c.top < limit);
        for child in &mut self.children {
            child.clip_below(limit);
        }
    }

    /// All text of the subtree in paint order, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.for_each_paint(&mut |p| {
            if let Paint::Text(run) = p {
                out.push(run.text.clone());
            }
        });
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Lays `root` out at `width` px, starting at the top-left of the flow.
pub fn layout(root: &StyledNode, width: f32) -> LayoutBox {
    layout_node(root, 0.0, 0.0, width, None)
}

fn face_of(style: &ComputedStyle) -> FontFace {
    FontFace::for_weight(style.font_weight)
}

fn display_text(text: &str, style: &ComputedStyle) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if style.uppercase {
        collapsed.to_uppercase()
    } else {
        collapsed
    }
}

fn text_width(text: &str, style: &ComputedStyle) -> f32 {
    let text = display_text(text, style);
    get_metrics(face_of(style)).measure_px(&text, style.font_size, style.letter_spacing_em)
}

/// Max-content width: the width the node takes when nothing wraps.
pub fn intrinsic_width(node: &StyledNode) -> f32 {
    let style = &node.style;
    match &node.content {
        StyledContent::Text(text) => text_width(text, style),
        StyledContent::Children(children) => {
            let inner = if style.is_row() {
                let sum: f32 = children.iter().map(intrinsic_width).sum();
                let gaps = style.column_gap * children.len().saturating_sub(1) as f32;
                sum + gaps
            } else {
                children.iter().map(intrinsic_width).fold(0.0, f32::max)
            };
            inner + style.padding.horizontal() + style.border.horizontal()
        }
    }
}

fn layout_node(node: &StyledNode, x: f32, y: f32, width: f32, link: Option<&str>) -> LayoutBox {
    match &node.content {
        StyledContent::Text(text) => layout_text(text, &node.style, x, y, width, link),
        StyledContent::Children(children) => layout_element(node, children, x, y, width, link),
    }
}

fn layout_text(
    text: &str,
    style: &ComputedStyle,
    x: f32,
    y: f32,
    width: f32,
    link: Option<&str>,
) -> LayoutBox {
    let text = display_text(text, style);
    let metrics = get_metrics(face_of(style));
    let lines = if style.nowrap {
        vec![text]
    } else {
        metrics.wrap(&text, style.font_size, style.letter_spacing_em, width)
    };

    let mut block = LayoutBox::new(None, x, width, y);
    let mut line_top = y;
    for line in lines {
        let line_width = metrics.measure_px(&line, style.font_size, style.letter_spacing_em);
        let mut line_box = LayoutBox::new(None, x, width, line_top);
        line_box.height = style.line_height;
        line_box.keep_together = true;
        line_box.stacked = false;
        line_box.content.push(Paint::Text(TextRun {
            x,
            y: line_top,
            width: line_width,
            line_height: style.line_height,
            size: style.font_size,
            face: face_of(style),
            color: style.color,
            tracking_em: style.letter_spacing_em,
            underline: style.underline,
            text: line,
        }));
        if let Some(href) = link {
            line_box.content.push(Paint::Link {
                x,
                y: line_top,
                width: line_width,
                height: style.line_height,
                href: href.to_string(),
            });
        }
        line_top += style.line_height;
        block.children.push(line_box);
    }
    block.height = line_top - y;
    block
}

fn layout_element(
    node: &StyledNode,
    children: &[StyledNode],
    x: f32,
    y: f32,
    width: f32,
    link: Option<&str>,
) -> LayoutBox {
    let style = &node.style;
    let link = node.href.as_deref().or(link);

    let mut el = LayoutBox::new(node.tag, x, width, y);
    el.keep_together = style.break_inside == BreakInside::Avoid;
    el.keep_with_next = node.tag.is_some_and(|t| t.is_heading());

    let inner_x = x + style.border.left + style.padding.left;
    let inner_w = (width - style.border.horizontal() - style.padding.horizontal()).max(0.0);
    let inner_top = y + style.border.top + style.padding.top;

    let inner_bottom = if style.is_row() && style.flex_wrap {
        layout_wrapping_row(&mut el, style, children, inner_x, inner_top, inner_w, link)
    } else if style.is_row() {
        el.stacked = false;
        layout_single_row(&mut el, style, children, inner_x, inner_top, inner_w, link)
    } else {
        layout_stack(&mut el, style, children, inner_x, inner_top, inner_w, link)
    };

    let natural = inner_bottom - y + style.padding.bottom + style.border.bottom;
    el.height = match style.height {
        // Clipped: content past the fixed height is not painted.
        Some(h) if style.overflow != Overflow::Visible => {
            el.clip_below(y + h);
            h
        }
        Some(h) => h.max(natural),
        None => natural,
    };

    if style.background.is_some() || !style.border.is_zero() {
        el.decor = Some(Decor {
            fill: style.background,
            border: style.border,
            border_color: style.border_color,
            radius: style.radius,
        });
    }
    el
}

/// Block flow: children one under another. Grid containers separate their
/// children by the row gap.
fn layout_stack(
    el: &mut LayoutBox,
    style: &ComputedStyle,
    children: &[StyledNode],
    x: f32,
    top: f32,
    width: f32,
    link: Option<&str>,
) -> f32 {
    let gap = if style.display == Display::Grid { style.row_gap } else { 0.0 };
    let mut cursor = top;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            cursor += gap;
        }
        cursor += child.style.margin_top;
        let placed = layout_node(child, x, cursor, width, link);
        cursor = placed.bottom();
        el.children.push(placed);
    }
    cursor
}

/// Single-line flex row. Items keep their max-content width; when they do
/// not fit, the first item gives up the overflow and wraps inside itself.
fn layout_single_row(
    el: &mut LayoutBox,
    style: &ComputedStyle,
    children: &[StyledNode],
    x: f32,
    top: f32,
    width: f32,
    link: Option<&str>,
) -> f32 {
    if children.is_empty() {
        return top;
    }
    let gaps = style.column_gap * (children.len() - 1) as f32;
    let mut widths: Vec<f32> = children
        .iter()
        .map(|c| intrinsic_width(c).min(width))
        .collect();
    let total: f32 = widths.iter().sum::<f32>() + gaps;
    if total > width {
        let rest: f32 = widths[1..].iter().sum();
        widths[0] = (width - rest - gaps).max(0.0);
    }

    let used: f32 = widths.iter().sum::<f32>() + gaps;
    let spread = if style.justify_between && children.len() > 1 {
        (width - used).max(0.0) / (children.len() - 1) as f32
    } else {
        0.0
    };

    let mut cursor_x = x;
    let mut bottom = top;
    for (child, w) in children.iter().zip(widths) {
        let item_top = top + child.style.margin_top;
        let placed = layout_node(child, cursor_x, item_top, w, link);
        bottom = bottom.max(placed.bottom());
        el.children.push(placed);
        cursor_x += w + style.column_gap + spread;
    }
    bottom
}

/// Wrapping flex row. Each visual line becomes an unsplittable group so the
/// paginator can break between lines.
fn layout_wrapping_row(
    el: &mut LayoutBox,
    style: &ComputedStyle,
    children: &[StyledNode],
    x: f32,
    top: f32,
    width: f32,
    link: Option<&str>,
) -> f32 {
    let mut lines: Vec<Vec<(&StyledNode, f32)>> = Vec::new();
    let mut current: Vec<(&StyledNode, f32)> = Vec::new();
    let mut used = 0.0_f32;
    for child in children {
        let w = intrinsic_width(child).min(width);
        let needed = if current.is_empty() { w } else { used + style.column_gap + w };
        if !current.is_empty() && needed > width + 0.01 {
            lines.push(std::mem::take(&mut current));
            used = w;
        } else {
            used = needed;
        }
        current.push((child, w));
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let mut cursor_y = top;
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            cursor_y += style.row_gap;
        }
        let mut group = LayoutBox::new(None, x, width, cursor_y);
        group.stacked = false;
        group.keep_together = true;
        let mut cursor_x = x;
        let mut bottom = cursor_y;
        for (child, w) in line {
            let placed = layout_node(child, cursor_x, cursor_y + child.style.margin_top, w, link);
            bottom = bottom.max(placed.bottom());
            group.children.push(placed);
            cursor_x += w + style.column_gap;
        }
        group.height = bottom - cursor_y;
        cursor_y = bottom;
        el.children.push(group);
    }
    cursor_y
}
