//! Utility-class vocabulary of the application stylesheet.
//!
//! Templates and the renderer speak in small single-purpose class tokens
//! (`px-10`, `text-sm`, `border-indigo-200`, ...). This module is the only
//! place that knows what each token means.

use std::collections::BTreeSet;

use crate::preview::tree::Element;
use crate::style::palette;
use crate::style::sheet::{
    BreakInside, Declaration, Display, GradientDirection, Overflow, Position, Rule, Selector,
    Sides, Stylesheet,
};

/// Spacing scale unit: `p-4` is 4 × 4px.
const SPACING_UNIT_PX: f32 = 4.0;

fn spacing(value: &str) -> Option<f32> {
    let n: f32 = value.parse().ok()?;
    (n >= 0.0).then_some(n * SPACING_UNIT_PX)
}

/// `[10px]` / `[2rem]` arbitrary values.
fn arbitrary_px(value: &str) -> Option<f32> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    if let Some(px) = inner.strip_suffix("px") {
        return px.parse().ok();
    }
    if let Some(rem) = inner.strip_suffix("rem") {
        return rem.parse::<f32>().ok().map(|r| r * 16.0);
    }
    None
}

fn font_size(value: &str) -> Option<(f32, f32)> {
    let pair = match value {
        "xs" => (12.0, 16.0),
        "sm" => (14.0, 20.0),
        "base" => (16.0, 24.0),
        "lg" => (18.0, 28.0),
        "xl" => (20.0, 28.0),
        "2xl" => (24.0, 32.0),
        "3xl" => (30.0, 36.0),
        "4xl" => (36.0, 40.0),
        "5xl" => (48.0, 48.0),
        other => {
            let px = arbitrary_px(other)?;
            (px, px * 1.5)
        }
    };
    Some(pair)
}

fn radius(value: &str) -> Option<f32> {
    let px = match value {
        "" => 4.0,
        "md" => 6.0,
        "lg" => 8.0,
        "xl" => 12.0,
        "2xl" => 16.0,
        "3xl" => 24.0,
        "full" => 9999.0,
        other => arbitrary_px(other)?,
    };
    Some(px)
}

fn padding_sides(prefix: &str) -> Option<Sides> {
    match prefix {
        "p" => Some(Sides::All),
        "px" => Some(Sides::X),
        "py" => Some(Sides::Y),
        "pt" => Some(Sides::Top),
        "pb" => Some(Sides::Bottom),
        _ => None,
    }
}

/// Declarations for one class token. Unknown tokens yield nothing.
pub fn declarations(token: &str) -> Vec<Declaration> {
    use Declaration as D;

    let fixed = match token {
        "block" => Some(D::Display(Display::Block)),
        "flex" => Some(D::Display(Display::Flex)),
        "inline-flex" => Some(D::Display(Display::InlineFlex)),
        "grid" => Some(D::Display(Display::Grid)),
        "hidden" => Some(D::Display(Display::None)),
        "sticky" => Some(D::Position(Position::Sticky)),
        "static" => Some(D::Position(Position::Static)),
        "overflow-hidden" => Some(D::Overflow(Overflow::Hidden)),
        "overflow-y-auto" | "overflow-x-auto" => Some(D::Overflow(Overflow::Auto)),
        "break-inside-avoid" => Some(D::BreakInside(BreakInside::Avoid)),
        "flex-wrap" => Some(D::FlexWrap),
        "justify-between" => Some(D::JustifyBetween),
        "uppercase" => Some(D::Uppercase),
        "underline" => Some(D::Underline),
        "whitespace-nowrap" => Some(D::NoWrap),
        "text-transparent" => Some(D::TransparentText),
        "bg-clip-text" => Some(D::ClipText),
        "bg-gradient-to-r" => Some(D::Gradient(GradientDirection::ToRight)),
        "bg-gradient-to-br" => Some(D::Gradient(GradientDirection::ToBottomRight)),
        "font-normal" => Some(D::FontWeight(400)),
        "font-medium" => Some(D::FontWeight(500)),
        "font-semibold" => Some(D::FontWeight(600)),
        "font-bold" => Some(D::FontWeight(700)),
        "font-extrabold" => Some(D::FontWeight(800)),
        "font-black" => Some(D::FontWeight(900)),
        "tracking-tight" => Some(D::LetterSpacing(-0.025)),
        "tracking-wide" => Some(D::LetterSpacing(0.025)),
        "tracking-wider" => Some(D::LetterSpacing(0.05)),
        "tracking-widest" => Some(D::LetterSpacing(0.1)),
        "leading-6" => Some(D::LineHeight(24.0)),
        "leading-7" => Some(D::LineHeight(28.0)),
        "border" => Some(D::BorderWidth(Sides::All, 1.0)),
        "border-2" => Some(D::BorderWidth(Sides::All, 2.0)),
        "border-b" => Some(D::BorderWidth(Sides::Bottom, 1.0)),
        "border-b-2" => Some(D::BorderWidth(Sides::Bottom, 2.0)),
        t if t.starts_with("shadow") => Some(D::Shadow),
        _ => None,
    };
    if let Some(decl) = fixed {
        return vec![decl];
    }

    if let Some(rest) = token.strip_prefix("rounded") {
        let value = rest.strip_prefix('-').unwrap_or(rest);
        return radius(value).map(D::Radius).into_iter().collect();
    }
    if let Some(rest) = token.strip_prefix("text-") {
        if let Some((size, line_height)) = font_size(rest) {
            return vec![D::FontSize { size, line_height }];
        }
        return palette::lookup(rest).map(D::Color).into_iter().collect();
    }
    if let Some(rest) = token.strip_prefix("bg-") {
        return palette::lookup(rest).map(D::Background).into_iter().collect();
    }
    if let Some(rest) = token.strip_prefix("from-") {
        return palette::lookup(rest).map(D::GradientFrom).into_iter().collect();
    }
    if let Some(rest) = token.strip_prefix("to-") {
        return palette::lookup(rest).map(D::GradientTo).into_iter().collect();
    }
    if let Some(rest) = token.strip_prefix("border-") {
        return palette::lookup(rest).map(D::BorderColor).into_iter().collect();
    }
    if let Some(rest) = token.strip_prefix("mt-") {
        return spacing(rest).map(D::MarginTop).into_iter().collect();
    }
    if let Some(rest) = token.strip_prefix("gap-x-") {
        return spacing(rest)
            .map(|c| D::Gap {
                row: None,
                column: Some(c),
            })
            .into_iter()
            .collect();
    }
    if let Some(rest) = token.strip_prefix("gap-y-") {
        return spacing(rest)
            .map(|r| D::Gap {
                row: Some(r),
                column: None,
            })
            .into_iter()
            .collect();
    }
    if let Some(rest) = token.strip_prefix("gap-") {
        return spacing(rest)
            .map(|g| D::Gap {
                row: Some(g),
                column: Some(g),
            })
            .into_iter()
            .collect();
    }
    if let Some(rest) = token.strip_prefix("h-") {
        return spacing(rest).map(D::Height).into_iter().collect();
    }
    if let Some((prefix, value)) = token.split_once('-') {
        if let Some(sides) = padding_sides(prefix) {
            return spacing(value)
                .map(|v| D::Padding(sides, v))
                .into_iter()
                .collect();
        }
    }
    Vec::new()
}

/// Builds the application stylesheet covering every class used under `root`,
/// in first-use order.
pub fn stylesheet_for(root: &Element) -> Stylesheet {
    let mut seen = BTreeSet::new();
    let mut sheet = Stylesheet::new("app");
    root.walk(&mut |el| {
        for class in &el.classes {
            if !seen.insert(class.clone()) {
                continue;
            }
            let decls = declarations(class);
            if !decls.is_empty() {
                sheet.push(Rule::new(vec![Selector::Class(class.clone())], decls));
            }
        }
    });
    sheet
}
