//! Print stylesheet layered over the application styles on the export surface.

use crate::layout::page::PageSetup;
use crate::preview::tree::Tag;
use crate::style::palette::Rgb;
use crate::style::sheet::{
    BreakInside, Declaration, Display, Overflow, Position, Rule, Selector, Stylesheet,
};

/// Id of the wrapper the detached preview clone is mounted in.
pub const PRINT_ROOT_ID: &str = "resume-print-root";

fn attr(tag: Option<Tag>, name: &str, value: Option<&str>) -> Selector {
    Selector::Attr {
        tag,
        name: name.to_string(),
        value: value.map(str::to_string),
    }
}

pub fn print_stylesheet(setup: &PageSetup) -> Stylesheet {
    let mut sheet = Stylesheet::new("print");
    sheet.important = true;
    sheet.page = Some(setup.clone());

    sheet.push(Rule::new(
        vec![Selector::Id(PRINT_ROOT_ID.to_string())],
        vec![
            Declaration::Background(Rgb::WHITE),
            Declaration::PrintColorExact,
        ],
    ));

    // Keep blocks whole across pages.
    let mut keep: Vec<Selector> = [Tag::H1, Tag::H2, Tag::H3, Tag::H4, Tag::Section, Tag::Li, Tag::P]
        .into_iter()
        .map(Selector::Tag)
        .collect();
    keep.extend(
        ["rounded", "border", "shadow"]
            .into_iter()
            .map(|f| Selector::ClassContains(f.to_string())),
    );
    keep.push(Selector::Class("card".to_string()));
    keep.push(Selector::Class("badge".to_string()));
    sheet.push(Rule::new(keep, vec![Declaration::BreakInside(BreakInside::Avoid)]));

    sheet.push(Rule::new(
        vec![attr(Some(Tag::A), "href", None)],
        vec![
            Declaration::Underline,
            Declaration::Overflow(Overflow::Visible),
        ],
    ));

    sheet.push(Rule::new(
        vec![
            Selector::Class("sticky".to_string()),
            Selector::ClassContains("sticky".to_string()),
        ],
        vec![Declaration::Position(Position::Static)],
    ));

    sheet.push(Rule::new(
        ["overflow-hidden", "overflow-y-auto", "overflow-x-auto"]
            .into_iter()
            .map(|c| Selector::Class(c.to_string()))
            .collect(),
        vec![Declaration::Overflow(Overflow::Visible)],
    ));

    sheet.push(Rule::new(
        vec![
            Selector::Tag(Tag::Button),
            attr(None, "role", Some("button")),
            attr(None, "data-no-print", Some("true")),
        ],
        vec![Declaration::Display(Display::None)],
    ));

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::tree::Element;
    use crate::style::cascade::style_tree;

    fn styled(el: &Element) -> crate::style::cascade::ComputedStyle {
        let sheet = print_stylesheet(&PageSetup::a4_portrait());
        style_tree(el, &[&sheet]).unwrap().style
    }

    #[test]
    fn test_cards_and_headings_are_kept_together() {
        assert_eq!(styled(&Element::new(Tag::H2)).break_inside, BreakInside::Avoid);
        assert_eq!(
            styled(&Element::new(Tag::Div).class("p-4 rounded-xl")).break_inside,
            BreakInside::Avoid
        );
        assert_eq!(
            styled(&Element::new(Tag::Div).class("mt-4 grid gap-4")).break_inside,
            BreakInside::Auto
        );
    }

    #[test]
    fn test_interactive_ui_is_hidden() {
        let sheet = print_stylesheet(&PageSetup::a4_portrait());
        for el in [
            Element::new(Tag::Button),
            Element::new(Tag::Div).attr("role", "button"),
            Element::new(Tag::Span).attr("data-no-print", "true"),
        ] {
            assert!(style_tree(&el, &[&sheet]).is_none());
        }
        assert!(style_tree(&Element::new(Tag::Span).attr("data-no-print", "false"), &[&sheet]).is_some());
    }

    #[test]
    fn test_sticky_and_overflow_are_neutralised() {
        let style = styled(&Element::new(Tag::Header).class("sticky top-0 overflow-hidden"));
        assert_eq!(style.position, Position::Static);
        assert_eq!(style.overflow, Overflow::Visible);
    }

    #[test]
    fn test_links_with_href_are_underlined() {
        assert!(styled(&Element::new(Tag::A).attr("href", "https://x.dev")).underline);
        assert!(!styled(&Element::new(Tag::A)).underline);
    }

    #[test]
    fn test_css_text_carries_page_rule_and_important() {
        let css = print_stylesheet(&PageSetup::a4_portrait()).to_css();
        assert!(css.starts_with("@page { size: A4; margin: 12mm 12mm 14mm 12mm; }"));
        assert!(css.contains("#resume-print-root {"));
        assert!(css.contains("break-inside: avoid-page !important;"));
        assert!(css.contains("button, [role=\"button\"], [data-no-print=\"true\"] {"));
    }
}
