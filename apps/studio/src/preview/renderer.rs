//! Resume data + resolved style → visual tree.
//!
//! Pure and deterministic: the same `(data, style)` always yields the same
//! tree, so the live preview can be rebuilt on every edit.

use crate::models::{Education, Entity, Experience, Project, ResumeData};
use crate::preview::tree::{Element, Tag, VisualTree, PREVIEW_ANCHOR_ID};
use crate::style::{LayoutMode, StyleParams};

const BADGE_CLASSES: &str = "badge inline-flex items-center gap-1 px-2 py-0.5 rounded-full \
     text-[10px] font-medium bg-emerald-50 text-emerald-700 border border-emerald-200";
const PRIMARY_LINE: &str = "font-medium text-slate-900";
const SECONDARY_LINE: &str = "text-sm text-slate-600";
const DATE_LINE: &str = "text-xs text-slate-500 whitespace-nowrap";
const BODY_TEXT: &str = "mt-2 text-slate-700 text-sm leading-6";

pub fn render(data: &ResumeData, style: &StyleParams) -> VisualTree {
    let mut root = Element::new(Tag::Div)
        .with_id(PREVIEW_ANCHOR_ID)
        .class("bg-white")
        .class(style.container)
        .class("surface overflow-hidden");

    if style.layout == LayoutMode::Modern {
        root = root.child(
            Element::new(Tag::Div)
                .class(style.decoration)
                .attr("data-decoration", "accent"),
        );
    }

    root = root.child(render_header(data, style));

    let mut body = Element::new(Tag::Div).class(style.section);
    if !data.about.trim().is_empty() {
        body = body.child(
            section("about", "About", style).child(
                Element::new(Tag::P)
                    .class("mt-3 text-slate-700 leading-7")
                    .text(data.about.as_str()),
            ),
        );
    }
    if !data.skills.is_empty() {
        let chips = data
            .skills
            .iter()
            .map(|skill| Element::new(Tag::Span).class(&style.chip_classes()).text(skill));
        body = body.child(
            section("skills", "Skills", style)
                .child(Element::new(Tag::Div).class("mt-4 flex flex-wrap gap-2").children(chips)),
        );
    }
    if !data.experiences.is_empty() {
        let cards = data.experiences.iter().map(|e| experience_card(e, style));
        body = body.child(
            section("experience", "Experience", style)
                .child(Element::new(Tag::Div).class("mt-4 grid gap-4").children(cards)),
        );
    }
    if !data.projects.is_empty() {
        let cards = data.projects.iter().map(|p| project_card(p, style));
        body = body.child(
            section("projects", "Projects", style)
                .child(Element::new(Tag::Div).class("mt-4 grid gap-4").children(cards)),
        );
    }
    if !data.education.is_empty() {
        let rows = data.education.iter().map(education_row);
        body = body.child(
            section("education", "Education", style)
                .child(Element::new(Tag::Div).class("mt-4 grid gap-3").children(rows)),
        );
    }

    VisualTree::new(root.child(body))
}

fn render_header(data: &ResumeData, style: &StyleParams) -> Element {
    let identity = Element::new(Tag::Div)
        .child(
            Element::new(Tag::H1)
                .class(&style.name_classes())
                .text(data.name.as_str()),
        )
        .child(
            Element::new(Tag::P)
                .class(style.title)
                .text(data.title.as_str()),
        );

    let contact = &data.contact;
    let mut line = Element::new(Tag::Div).class(style.contact);
    for value in [&contact.email, &contact.phone, &contact.location] {
        if !value.trim().is_empty() {
            line = line.child(Element::new(Tag::Span).text(value.as_str()));
        }
    }
    if let Some(website) = contact.website.as_deref().filter(|w| !w.trim().is_empty()) {
        line = line.child(
            Element::new(Tag::A)
                .class("underline decoration-dotted")
                .attr("href", website)
                .attr("target", "_blank")
                .text("Website"),
        );
    }

    Element::new(Tag::Div)
        .class(style.header)
        .attr("data-role", "header")
        .child(
            Element::new(Tag::Div)
                .class("flex items-start justify-between gap-6")
                .child(identity),
        )
        .child(line)
}

fn section(key: &str, title: &str, style: &StyleParams) -> Element {
    Element::new(Tag::Section).attr("data-section", key).child(
        Element::new(Tag::H2)
            .class(&style.section_title_classes())
            .text(title),
    )
}

fn badge() -> Element {
    Element::new(Tag::Span)
        .class(BADGE_CLASSES)
        .attr("data-badge", "verified")
        .text("Verified")
}

fn date_range(start: &str, end: &str) -> String {
    format!("{start} — {end}")
}

/// Right-hand cluster of a card: optional badge followed by `trailing`.
fn meta(verified: bool, trailing: Option<Element>) -> Element {
    let mut cluster = Element::new(Tag::Div).class("flex items-center gap-3");
    if verified {
        cluster = cluster.child(badge());
    }
    if let Some(el) = trailing {
        cluster = cluster.child(el);
    }
    cluster
}

fn experience_card(exp: &Experience, style: &StyleParams) -> Element {
    Element::new(Tag::Div)
        .class(&style.card_classes())
        .attr("data-entity-id", exp.id.to_string())
        .child(
            Element::new(Tag::Div)
                .class("flex items-baseline justify-between gap-4")
                .child(
                    Element::new(Tag::Div)
                        .child(Element::new(Tag::P).class(PRIMARY_LINE).text(exp.role.as_str()))
                        .child(
                            Element::new(Tag::P)
                                .class(SECONDARY_LINE)
                                .text(exp.company.as_str()),
                        ),
                )
                .child(meta(
                    exp.is_verified(),
                    Some(
                        Element::new(Tag::P)
                            .class(DATE_LINE)
                            .text(date_range(&exp.start, &exp.end)),
                    ),
                )),
        )
        .child(Element::new(Tag::P).class(BODY_TEXT).text(exp.summary.as_str()))
}

fn project_card(project: &Project, style: &StyleParams) -> Element {
    let link = project
        .link
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .map(|href| {
            Element::new(Tag::A)
                .class("text-xs underline decoration-dotted")
                .attr("href", href)
                .attr("target", "_blank")
                .text("View")
        });

    Element::new(Tag::Div)
        .class(&style.card_classes())
        .attr("data-entity-id", project.id.to_string())
        .child(
            Element::new(Tag::Div)
                .class("flex items-baseline justify-between gap-4")
                .child(Element::new(Tag::P).class(PRIMARY_LINE).text(project.name.as_str()))
                .child(meta(project.is_verified(), link)),
        )
        .child(
            Element::new(Tag::P)
                .class(BODY_TEXT)
                .text(project.description.as_str()),
        )
}

fn education_row(edu: &Education) -> Element {
    Element::new(Tag::Div)
        .class("flex items-baseline justify-between")
        .attr("data-entity-id", edu.id.to_string())
        .child(
            Element::new(Tag::Div)
                .child(Element::new(Tag::P).class(PRIMARY_LINE).text(edu.school.as_str()))
                .child(Element::new(Tag::P).class(SECONDARY_LINE).text(edu.degree.as_str())),
        )
        .child(meta(
            edu.is_verified(),
            Some(
                Element::new(Tag::P)
                    .class(DATE_LINE)
                    .text(date_range(&edu.start, &edu.end)),
            ),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Contact, SkillSet};
    use crate::models::{sample_resume, Template, Theme};
    use crate::style::resolve;

    fn ada() -> ResumeData {
        ResumeData {
            name: "Ada Lovelace".into(),
            title: "Analyst".into(),
            about: "First programmer.".into(),
            contact: Contact {
                email: "ada@example.com".into(),
                phone: String::new(),
                location: "London".into(),
                website: None,
            },
            skills: ["Mathematics"].into_iter().collect::<SkillSet>(),
            experiences: vec![Experience {
                company: "Analytical Engine".into(),
                role: "Programmer".into(),
                start: "1842".into(),
                end: "1843".into(),
                summary: "Notes on the engine.".into(),
                verified: Some(true),
                ..Experience::blank()
            }],
            projects: Vec::new(),
            education: Vec::new(),
            theme: Theme::Indigo,
            template: Template::Minimal,
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let data = sample_resume();
        let style = resolve(data.theme, data.template);
        assert_eq!(render(&data, &style), render(&data, &style));
    }

    #[test]
    fn test_root_carries_anchor_id() {
        let data = ada();
        let tree = render(&data, &resolve(data.theme, data.template));
        assert_eq!(tree.root().id.as_deref(), Some(PREVIEW_ANCHOR_ID));
        assert!(tree.root().has_class("overflow-hidden"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let data = ada();
        let tree = render(&data, &resolve(data.theme, data.template));
        assert_eq!(tree.section_keys(), vec!["about", "skills", "experience"]);

        let mut bare = ada();
        bare.about = "   ".into();
        bare.skills = SkillSet::new();
        let tree = render(&bare, &resolve(bare.theme, bare.template));
        assert_eq!(tree.section_keys(), vec!["experience"]);
    }

    #[test]
    fn test_entities_keep_sequence_order() {
        let mut data = sample_resume();
        data.projects.push(Project {
            name: "Second".into(),
            ..Project::blank()
        });
        let tree = render(&data, &resolve(data.theme, data.template));
        let section = tree.section("projects").unwrap();
        let ids: Vec<_> = VisualTree::entities_in(section)
            .into_iter()
            .filter_map(|el| el.get_attr("data-entity-id"))
            .map(str::to_string)
            .collect();
        let expected: Vec<_> = data.projects.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_badge_only_when_verified_true() {
        let mut data = ada();
        data.experiences.push(Experience {
            verified: Some(false),
            ..Experience::blank()
        });
        data.experiences.push(Experience {
            verified: None,
            ..Experience::blank()
        });
        let tree = render(&data, &resolve(data.theme, data.template));
        let cards = VisualTree::entities_in(tree.section("experience").unwrap());
        let badges: Vec<bool> = cards.iter().map(|c| VisualTree::has_verified_badge(c)).collect();
        assert_eq!(badges, vec![true, false, false]);
    }

    #[test]
    fn test_links_keep_literal_href() {
        let mut data = sample_resume();
        data.contact.website = Some("/me".into());
        data.projects[0].link = Some("not a url".into());
        let tree = render(&data, &resolve(data.theme, data.template));
        let hrefs: Vec<_> = tree
            .root()
            .find_all(|el| el.tag == Tag::A)
            .into_iter()
            .filter_map(|el| el.get_attr("href"))
            .collect();
        assert_eq!(hrefs, vec!["/me", "not a url"]);
    }

    #[test]
    fn test_blank_contact_values_are_skipped() {
        let data = ada();
        let tree = render(&data, &resolve(data.theme, data.template));
        let header = tree
            .root()
            .find_all(|el| el.get_attr("data-role") == Some("header"))[0];
        assert_eq!(
            header.text_content(),
            "Ada Lovelace Analyst ada@example.com London"
        );
    }

    #[test]
    fn test_modern_layout_adds_decoration() {
        let data = sample_resume();
        let creative = render(&data, &resolve(Theme::Rose, Template::Creative));
        let professional = render(&data, &resolve(Theme::Rose, Template::Professional));
        let has_decoration =
            |t: &VisualTree| !t.root().find_all(|el| el.get_attr("data-decoration").is_some()).is_empty();
        assert!(has_decoration(&creative));
        assert!(!has_decoration(&professional));
    }

    #[test]
    fn test_dates_use_em_dash() {
        let data = ada();
        let tree = render(&data, &resolve(data.theme, data.template));
        assert!(tree.root().text_content().contains("1842 — 1843"));
    }
}
