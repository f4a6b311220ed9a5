//! Pagination: cuts the continuous flow into fixed-height pages.
//!
//! Walks the layout tree in document order carrying a running `shift` (how
//! far everything below has been pushed down by page breaks so far):
//!
//! - a box that lies on one page is emitted as-is;
//! - a keep-together box that crosses a boundary but fits on a page is moved
//!   to the top of the next page;
//! - any other crossing box is split between its children (text lines are
//!   atomic children of paragraphs);
//! - a heading is moved together with the leading unit of its next sibling;
//! - backgrounds and borders of split boxes are stretched over the pushed
//!   content and cut per page.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::flow::{Decor, LayoutBox, Paint};
use crate::layout::page::PageSetup;

const EPS: f32 = 0.01;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Paints of one page, y relative to the top of the page content box.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageContent {
    pub paints: Vec<Paint>,
}

impl PageContent {
    pub fn texts(&self) -> Vec<&str> {
        self.paints
            .iter()
            .filter_map(|p| match p {
                Paint::Text(run) => Some(run.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Lowest edge of anything painted on the page.
    pub fn used_height(&self) -> f32 {
        self.paints
            .iter()
            .map(|p| match p {
                Paint::Rect { y, height, .. } | Paint::Link { y, height, .. } => y + height,
                Paint::Text(run) => run.y + run.line_height,
            })
            .fold(0.0, f32::max)
    }
}

/// How full the final page is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFillVerdict {
    /// ≥ 25% of the last page used.
    Balanced,
    /// < 25% of the last page used, a short tail spilled over.
    SparseLastPage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationReport {
    pub page_count: usize,
    /// Keep-together units pushed to the next page.
    pub moved_units: usize,
    /// Boxes broken across a page boundary.
    pub split_units: usize,
    /// Headings moved to stay with the content that follows.
    pub kept_with_next: usize,
    /// Used fraction of each page's content height.
    pub fill: Vec<f32>,
    pub verdict: PageFillVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated {
    pub pages: Vec<PageContent>,
    pub report: PaginationReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Core function
// ────────────────────────────────────────────────────────────────────────────

pub fn paginate(root: &LayoutBox, setup: &PageSetup) -> Paginated {
    paginate_at(root, setup.content_height_px())
}

/// Paginates at an explicit page height in px.
pub fn paginate_at(root: &LayoutBox, page_height: f32) -> Paginated {
    let mut p = Paginator {
        page_height,
        placed: Vec::new(),
        moved_units: 0,
        split_units: 0,
        kept_with_next: 0,
    };
    p.place(root, 0.0);

    let page_count = p
        .placed
        .iter()
        .map(|(page, _)| page + 1)
        .max()
        .unwrap_or(1);
    let mut pages = vec![PageContent::default(); page_count];
    for (page, paint) in p.placed {
        pages[page].paints.push(paint);
    }

    let report = analyze_page_fill(&pages, page_height, p.moved_units, p.split_units, p.kept_with_next);
    debug!(
        pages = report.page_count,
        moved = report.moved_units,
        split = report.split_units,
        "paginated layout"
    );
    Paginated { pages, report }
}

fn analyze_page_fill(
    pages: &[PageContent],
    page_height: f32,
    moved_units: usize,
    split_units: usize,
    kept_with_next: usize,
) -> PaginationReport {
    let fill: Vec<f32> = pages
        .iter()
        .map(|p| (p.used_height() / page_height).clamp(0.0, 1.0))
        .collect();
    let last = fill.last().copied().unwrap_or(0.0);
    let verdict = if pages.len() > 1 && last < 0.25 {
        PageFillVerdict::SparseLastPage
    } else {
        PageFillVerdict::Balanced
    };
    PaginationReport {
        page_count: pages.len(),
        moved_units,
        split_units,
        kept_with_next,
        fill,
        verdict,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal
// ────────────────────────────────────────────────────────────────────────────

struct Paginator {
    page_height: f32,
    placed: Vec<(usize, Paint)>,
    moved_units: usize,
    split_units: usize,
    kept_with_next: usize,
}

impl Paginator {
    fn page_of(&self, y: f32) -> usize {
        ((y + EPS) / self.page_height).floor().max(0.0) as usize
    }

    fn crosses(&self, top: f32, bottom: f32) -> bool {
        bottom - top > EPS && self.page_of(top) != self.page_of(bottom - 2.0 * EPS)
    }

    /// Distance from `y` to the start of the next page.
    fn push_to_next_page(&self, y: f32) -> f32 {
        (self.page_of(y) + 1) as f32 * self.page_height - y
    }

    fn fits_on_a_page(&self, height: f32) -> bool {
        height <= self.page_height + EPS
    }

    /// Places `node` and returns the shift in effect after it.
    fn place(&mut self, node: &LayoutBox, mut shift: f32) -> f32 {
        let top = node.top + shift;
        let bottom = top + node.height;
        if !self.crosses(top, bottom) {
            self.emit_whole(node, shift);
            return shift;
        }

        let atomic = node.keep_together || !node.can_split();
        if atomic && self.fits_on_a_page(node.height) {
            shift += self.push_to_next_page(top);
            self.moved_units += 1;
            debug!(tag = ?node.tag, height = node.height, "moved unit to next page");
            self.emit_whole(node, shift);
            return shift;
        }

        if !node.can_split() {
            // Taller than a page and indivisible: emit as-is, cut by the page edge.
            self.emit_whole(node, shift);
            return shift;
        }

        // The box's own top border and padding travel with its first unit.
        let lead = leading_unit_height(node);
        if self.crosses(top, top + lead) && self.fits_on_a_page(lead) {
            shift += self.push_to_next_page(top);
            self.moved_units += 1;
            debug!(tag = ?node.tag, "moved split box start to next page");
        }

        self.split_units += 1;
        let start_shift = shift;
        let outer = std::mem::take(&mut self.placed);
        for (i, child) in node.children.iter().enumerate() {
            if child.keep_with_next {
                if let Some(next) = node.children.get(i + 1) {
                    shift = self.keep_with_next(child, next, shift);
                }
            }
            shift = self.place(child, shift);
        }
        let body = std::mem::replace(&mut self.placed, outer);

        if let Some(decor) = &node.decor {
            let top = node.top + start_shift;
            let bottom = node.bottom() + shift;
            self.emit_decor(node, decor, top, bottom);
        }
        self.placed.extend(body);
        shift
    }

    /// Moves `heading` to the next page when it and the first unit after it
    /// would otherwise be separated by a page boundary.
    fn keep_with_next(&mut self, heading: &LayoutBox, next: &LayoutBox, shift: f32) -> f32 {
        let top = heading.top + shift;
        let bottom = next.top + leading_unit_height(next) + shift;
        if self.crosses(top, bottom) && self.fits_on_a_page(bottom - top) {
            self.kept_with_next += 1;
            debug!(tag = ?heading.tag, "kept heading with next unit");
            return shift + self.push_to_next_page(top);
        }
        shift
    }

    fn emit_whole(&mut self, node: &LayoutBox, shift: f32) {
        if let Some(decor) = &node.decor {
            self.emit_decor(node, decor, node.top + shift, node.bottom() + shift);
        }
        for paint in &node.content {
            let moved = paint.shifted(shift);
            let page = self.page_of(moved.top());
            let page_top = page as f32 * self.page_height;
            self.placed.push((page, moved.shifted(-page_top)));
        }
        for child in &node.children {
            self.emit_whole(child, shift);
        }
    }

    /// Cuts the box background/border spanning `top..bottom` into one rect per
    /// page. Top border only on the first piece, bottom border only on the
    /// last, corner radius only when the box is not cut at all.
    fn emit_decor(&mut self, node: &LayoutBox, decor: &Decor, top: f32, bottom: f32) {
        let first = self.page_of(top);
        let last = self.page_of((bottom - 2.0 * EPS).max(top));
        for page in first..=last {
            let page_top = page as f32 * self.page_height;
            let seg_top = top.max(page_top);
            let seg_bottom = bottom.min(page_top + self.page_height);
            if seg_bottom - seg_top <= EPS {
                continue;
            }
            let mut border = decor.border;
            if page != first {
                border.top = 0.0;
            }
            if page != last {
                border.bottom = 0.0;
            }
            self.placed.push((
                page,
                Paint::Rect {
                    x: node.x,
                    y: seg_top - page_top,
                    width: node.width,
                    height: seg_bottom - seg_top,
                    fill: decor.fill,
                    border,
                    border_color: decor.border_color,
                    radius: if first == last { decor.radius } else { 0.0 },
                },
            ));
        }
    }
}

/// Height from the top of `node` to the bottom of the first unit the
/// paginator would not split further.
fn leading_unit_height(node: &LayoutBox) -> f32 {
    if node.keep_together || !node.can_split() {
        return node.height;
    }
    match node.children.first() {
        Some(first) => (first.top - node.top) + leading_unit_height(first),
        None => node.height,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::flow::layout;
    use crate::preview::tree::{Element, Tag};
    use crate::style::cascade::style_tree;
    use crate::style::sheet::{BreakInside, Declaration, Rule, Selector, Stylesheet};

    fn keep_cards() -> Stylesheet {
        let mut sheet = Stylesheet::new("print");
        sheet.push(Rule::new(
            vec![Selector::Class("card".into()), Selector::Tag(Tag::H2)],
            vec![Declaration::BreakInside(BreakInside::Avoid)],
        ));
        sheet
    }

    fn card(label: &str, lines: usize) -> Element {
        let mut el = Element::new(Tag::Div).class("card p-2 border text-sm");
        for i in 0..lines {
            el = el.child(Element::new(Tag::P).text(format!("{label} line {i}.")));
        }
        el
    }

    fn paginate_tree(root: &Element, page_height: f32) -> Paginated {
        let sheet = keep_cards();
        let styled = style_tree(root, &[&sheet]).unwrap();
        paginate_at(&layout(&styled, 400.0), page_height)
    }

    fn page_with(paginated: &Paginated, needle: &str) -> Vec<usize> {
        paginated
            .pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.texts().iter().any(|t| t.contains(needle)))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_short_flow_is_one_page() {
        let root = Element::new(Tag::Div).child(card("A", 3));
        let out = paginate_tree(&root, 500.0);
        assert_eq!(out.report.page_count, 1);
        assert_eq!(out.report.moved_units, 0);
        assert_eq!(out.report.verdict, PageFillVerdict::Balanced);
    }

    #[test]
    fn test_card_crossing_boundary_moves_whole() {
        // each card: 1 + 8 + 4×20 + 8 + 1 = 98px, gap 16
        let root = Element::new(Tag::Div)
            .class("grid gap-4")
            .child(card("A", 4))
            .child(card("B", 4))
            .child(card("C", 4));
        let out = paginate_tree(&root, 250.0);
        assert_eq!(page_with(&out, "A line"), vec![0]);
        // B spans 114..212: fits on page 0
        assert_eq!(page_with(&out, "B line"), vec![0]);
        // C would span 228..326 → page 1 entirely
        assert_eq!(page_with(&out, "C line"), vec![1]);
        assert!(out.report.split_units >= 1);
    }

    #[test]
    fn test_every_card_lives_on_exactly_one_page() {
        let mut root = Element::new(Tag::Div).class("grid gap-3");
        for i in 0..20 {
            root = root.child(card(&format!("K{i:02}"), 2 + i % 4));
        }
        let out = paginate_tree(&root, 300.0);
        assert!(out.report.page_count > 3);
        for i in 0..20 {
            let pages = page_with(&out, &format!("K{i:02} line"));
            assert_eq!(pages.len(), 1, "card K{i:02} split over {pages:?}");
        }
    }

    #[test]
    fn test_oversized_unit_splits_at_lines() {
        let root = Element::new(Tag::Div).child(card("Tall", 30));
        let out = paginate_tree(&root, 200.0);
        assert!(out.report.page_count >= 3);
        // no line is cut: each line text appears exactly once
        for i in 0..30 {
            let pages = page_with(&out, &format!("Tall line {i}."));
            assert_eq!(pages.len(), 1);
        }
        // the card border is painted on every page it spans
        for page in &out.pages {
            assert!(page.paints.iter().any(|p| matches!(p, Paint::Rect { .. })));
        }
    }

    #[test]
    fn test_split_card_frame_starts_with_its_first_line() {
        // filler 0..176, card top 176; first line would span 185..205
        let root = Element::new(Tag::Div)
            .child(Element::new(Tag::Div).class("h-44"))
            .child(card("Tall", 30));
        let out = paginate_tree(&root, 200.0);

        assert!(out.pages[0].paints.is_empty(), "stray paints: {:?}", out.pages[0].paints);
        assert_eq!(page_with(&out, "Tall line 0."), vec![1]);
        let frame = out.pages[1]
            .paints
            .iter()
            .find_map(|p| match p {
                Paint::Rect { y, border, .. } => Some((*y, *border)),
                _ => None,
            })
            .unwrap();
        assert!(frame.0.abs() < EPS);
        assert_eq!(frame.1.top, 1.0);
    }

    #[test]
    fn test_heading_stays_with_first_card() {
        let section = Element::new(Tag::Section)
            .child(Element::new(Tag::H2).class("text-sm").text("Experience"))
            .child(
                Element::new(Tag::Div)
                    .class("grid gap-4")
                    .child(card("First", 4))
                    .child(card("Second", 4)),
            );
        let root = Element::new(Tag::Div)
            .child(Element::new(Tag::Div).class("h-40"))
            .child(section);
        // filler 0..160, heading 160..180, first card 180..278
        let out = paginate_tree(&root, 220.0);
        assert_eq!(page_with(&out, "Experience"), vec![1]);
        assert_eq!(page_with(&out, "First line"), vec![1]);
        assert!(out.report.kept_with_next >= 1);
    }

    #[test]
    fn test_lines_never_straddle_pages() {
        let text = "lorem ipsum dolor ".repeat(200);
        let root = Element::new(Tag::P).class("text-sm").text(text);
        let out = paginate_tree(&root, 130.0);
        for page in &out.pages {
            for paint in &page.paints {
                if let Paint::Text(run) = paint {
                    assert!(run.y >= -EPS && run.y + run.line_height <= 130.0 + EPS);
                }
            }
        }
    }

    #[test]
    fn test_sparse_last_page_verdict() {
        let root = Element::new(Tag::Div)
            .class("grid")
            .child(Element::new(Tag::Div).class("h-40"))
            .child(Element::new(Tag::P).class("text-sm").text("tail"));
        let out = paginate_tree(&root, 170.0);
        assert_eq!(out.report.page_count, 2);
        assert_eq!(out.report.verdict, PageFillVerdict::SparseLastPage);
    }
}
