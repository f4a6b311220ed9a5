//! Paginated display list → PDF bytes.
//!
//! Uses the standard Helvetica faces (no embedding), WinAnsi-encoded text and
//! one URI link annotation per linked line.

use std::collections::BTreeSet;

use bytes::Bytes;
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::layout::flow::{Paint, TextRun};
use crate::layout::font_metrics::FontFace;
use crate::layout::page::{PageSetup, PT_PER_PX};
use crate::layout::paginate::PageContent;
use crate::style::cascade::Edges;
use crate::style::palette::Rgb;

/// Bezier control-point factor for quarter circles.
const KAPPA: f32 = 0.552_284_8;

/// Baseline offset from the top of the em box, in em (Helvetica ascent).
const ASCENT_EM: f32 = 0.77;

pub fn render_pdf(pages: &[PageContent], setup: &PageSetup, title: &str) -> Bytes {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let info_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.document_info(info_id).title(TextStr(title));

    for (id, face) in [(regular_id, FontFace::Regular), (bold_id, FontFace::Bold)] {
        pdf.type1_font(id)
            .base_font(Name(face.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let mut page_ids = Vec::with_capacity(pages.len());
    for content in pages {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let canvas = Canvas { setup };
        let mut ops = Content::new();
        let mut links = Vec::new();
        for paint in &content.paints {
            match paint {
                Paint::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    border,
                    border_color,
                    radius,
                } => canvas.draw_box(
                    &mut ops,
                    canvas.rect(*x, *y, *width, *height),
                    *fill,
                    border,
                    *border_color,
                    *radius * PT_PER_PX,
                ),
                Paint::Text(run) => canvas.draw_text(&mut ops, run),
                Paint::Link {
                    x,
                    y,
                    width,
                    height,
                    href,
                } => links.push((canvas.rect(*x, *y, *width, *height), href.clone())),
            }
        }
        pdf.stream(content_id, &ops.finish());

        let mut annotation_ids = Vec::with_capacity(links.len());
        for (area, href) in links {
            let id = alloc.bump();
            annotation_ids.push(id);
            let mut annotation = pdf.annotation(id);
            annotation
                .subtype(AnnotationType::Link)
                .rect(Rect::new(area.x, area.y, area.x + area.w, area.y + area.h))
                .border(0.0, 0.0, 0.0, None::<&[f32]>);
            annotation
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(href.as_bytes()));
            annotation.finish();
        }

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, setup.width_pt, setup.height_pt))
            .parent(tree_id)
            .contents(content_id);
        page.resources()
            .fonts()
            .pair(Name(FontFace::Regular.resource_name()), regular_id)
            .pair(Name(FontFace::Bold.resource_name()), bold_id);
        if !annotation_ids.is_empty() {
            page.annotations(annotation_ids);
        }
        page.finish();
    }

    let count = page_ids.len() as i32;
    pdf.pages(tree_id).kids(page_ids).count(count);

    Bytes::from(pdf.finish())
}

/// Rectangle in PDF user space (origin bottom-left, points).
#[derive(Debug, Clone, Copy)]
struct Area {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

struct Canvas<'a> {
    setup: &'a PageSetup,
}

impl Canvas<'_> {
    fn x(&self, px: f32) -> f32 {
        self.setup.margin_left_pt() + px * PT_PER_PX
    }

    /// Page-space y of a content-box y measured downward in px.
    fn y(&self, px: f32) -> f32 {
        self.setup.height_pt - self.setup.margin_top_pt() - px * PT_PER_PX
    }

    fn rect(&self, x: f32, y: f32, width: f32, height: f32) -> Area {
        Area {
            x: self.x(x),
            y: self.y(y + height),
            w: width * PT_PER_PX,
            h: height * PT_PER_PX,
        }
    }

    fn draw_box(
        &self,
        ops: &mut Content,
        area: Area,
        fill: Option<Rgb>,
        border: &Edges,
        border_color: Rgb,
        radius: f32,
    ) {
        let radius = radius.min(area.w / 2.0).min(area.h / 2.0).max(0.0);
        if let Some(color) = fill {
            let (r, g, b) = color.unit();
            ops.set_fill_rgb(r, g, b);
            rounded_rect(ops, area, radius);
            ops.fill_nonzero();
        }
        if border.is_zero() {
            return;
        }

        let uniform = border.top == border.right
            && border.top == border.bottom
            && border.top == border.left;
        let (r, g, b) = border_color.unit();
        if uniform {
            let w = border.top * PT_PER_PX;
            ops.set_stroke_rgb(r, g, b);
            ops.set_line_width(w);
            let inset = Area {
                x: area.x + w / 2.0,
                y: area.y + w / 2.0,
                w: (area.w - w).max(0.0),
                h: (area.h - w).max(0.0),
            };
            rounded_rect(ops, inset, (radius - w / 2.0).max(0.0));
            ops.stroke();
        } else {
            // Mixed widths (e.g. bottom-only rules or cut boxes): square strips.
            ops.set_fill_rgb(r, g, b);
            let (t, rt, bt, l) = (
                border.top * PT_PER_PX,
                border.right * PT_PER_PX,
                border.bottom * PT_PER_PX,
                border.left * PT_PER_PX,
            );
            if t > 0.0 {
                ops.rect(area.x, area.y + area.h - t, area.w, t);
            }
            if bt > 0.0 {
                ops.rect(area.x, area.y, area.w, bt);
            }
            if l > 0.0 {
                ops.rect(area.x, area.y, l, area.h);
            }
            if rt > 0.0 {
                ops.rect(area.x + area.w - rt, area.y, rt, area.h);
            }
            ops.fill_nonzero();
        }
    }

    fn draw_text(&self, ops: &mut Content, run: &TextRun) {
        let size = run.size * PT_PER_PX;
        let top_px = run.y + (run.line_height - run.size) / 2.0;
        let baseline = self.y(top_px) - ASCENT_EM * size;
        let x = self.x(run.x);
        let (r, g, b) = run.color.unit();

        ops.set_fill_rgb(r, g, b);
        ops.begin_text();
        ops.set_font(Name(run.face.resource_name()), size);
        ops.set_char_spacing(run.tracking_em * size);
        ops.next_line(x, baseline);
        ops.show(Str(&encode_win_ansi(&run.text)));
        ops.end_text();

        if run.underline {
            let thickness = (size * 0.06).max(0.5);
            ops.rect(x, baseline - size * 0.12, run.width * PT_PER_PX, thickness);
            ops.fill_nonzero();
        }
    }
}

/// Appends a closed rectangle path, with circular corners when `radius > 0`.
fn rounded_rect(ops: &mut Content, a: Area, radius: f32) {
    if radius <= 0.0 {
        ops.rect(a.x, a.y, a.w, a.h);
        return;
    }
    let k = radius * KAPPA;
    let (x0, y0, x1, y1) = (a.x, a.y, a.x + a.w, a.y + a.h);
    ops.move_to(x0 + radius, y0);
    ops.line_to(x1 - radius, y0);
    ops.cubic_to(x1 - radius + k, y0, x1, y0 + radius - k, x1, y0 + radius);
    ops.line_to(x1, y1 - radius);
    ops.cubic_to(x1, y1 - radius + k, x1 - radius + k, y1, x1 - radius, y1);
    ops.line_to(x0 + radius, y1);
    ops.cubic_to(x0 + radius - k, y1, x0, y1 - radius + k, x0, y1 - radius);
    ops.line_to(x0, y0 + radius);
    ops.cubic_to(x0, y0 + radius - k, x0 + radius - k, y0, x0 + radius, y0);
    ops.close_path();
}

/// CP-1252 code of `c`, if the standard faces can show it.
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        '€' => Some(0x80),
        '‚' => Some(0x82),
        '„' => Some(0x84),
        '…' => Some(0x85),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        '™' => Some(0x99),
        _ => None,
    }
}

/// Encodes text for a WinAnsi (CP-1252) simple font. Unmappable characters
/// become `?`; `unencodable_chars` reports them beforehand.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

/// Distinct characters on `pages` that the standard faces cannot show,
/// in code point order.
pub fn unencodable_chars(pages: &[PageContent]) -> Vec<char> {
    let missing: BTreeSet<char> = pages
        .iter()
        .flat_map(|page| page.texts())
        .flat_map(str::chars)
        .filter(|c| win_ansi_byte(*c).is_none())
        .collect();
    missing.into_iter().collect()
}
