//! Application page shell around the live preview.

use url::Url;

use crate::models::ResumeData;
use crate::preview::renderer::render;
use crate::preview::tree::{Element, Tag, PREVIEW_ANCHOR_ID};
use crate::style::StyleParams;

/// Snapshot of the whole page, the input of an export.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Element,
    /// Base for resolving relative links.
    pub base_url: Url,
    pub title: String,
}

impl Document {
    /// The preview subtree, if the page contains one.
    pub fn anchor(&self) -> Option<&Element> {
        self.root.find_by_id(PREVIEW_ANCHOR_ID)
    }
}

pub fn render_page(data: &ResumeData, style: &StyleParams, base_url: &Url) -> Document {
    let toolbar = Element::new(Tag::Header)
        .class("sticky top-0 z-10 bg-white border-b border-slate-200 px-6 py-3 flex items-center justify-between")
        .child(
            Element::new(Tag::Span)
                .class("text-lg font-bold text-slate-900")
                .text("Resume Studio"),
        )
        .child(
            Element::new(Tag::Button)
                .class("px-4 py-2 rounded-lg bg-indigo-600 text-white text-sm font-medium")
                .attr("type", "button")
                .attr("data-action", "download-pdf")
                .text("Download PDF"),
        );

    let main = Element::new(Tag::Main)
        .class("px-6 py-8 bg-slate-50")
        .child(render(data, style).into_root());

    Document {
        root: Element::new(Tag::Div)
            .class("min-h-screen bg-slate-50")
            .child(toolbar)
            .child(main),
        base_url: base_url.clone(),
        title: data.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_resume;
    use crate::style::resolve;

    #[test]
    fn test_page_wraps_preview_and_toolbar() {
        let data = sample_resume();
        let base = Url::parse("http://localhost:5173/").unwrap();
        let doc = render_page(&data, &resolve(data.theme, data.template), &base);

        assert!(doc.anchor().is_some());
        assert_eq!(doc.title, "Priyanshu Sharma");
        let buttons = doc.root.find_all(|el| el.tag == Tag::Button);
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].text_content(), "Download PDF");
        // the button lives outside the preview
        assert!(doc.anchor().unwrap().find_all(|el| el.tag == Tag::Button).is_empty());
    }
}
