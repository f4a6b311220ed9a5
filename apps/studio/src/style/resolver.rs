//! Theme × template → concrete style parameters.
//!
//! Re-run on every keystroke, so it stays a pure `match` with no allocation
//! beyond the returned value.

use serde::Serialize;

use crate::models::{Template, Theme};

/// Whether the template paints extra decorative layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Single,
    Modern,
}

/// Resolved visual parameters. Every field is a space-separated class list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleParams {
    pub theme: Theme,
    pub template: Template,
    /// Text colour of the name and section headings.
    pub accent: &'static str,
    pub chip: &'static str,
    pub chip_border: &'static str,
    /// Border colour of entity cards.
    pub border: &'static str,
    /// Decorative layer painted above the header in `Modern` layouts.
    pub decoration: &'static str,
    pub container: &'static str,
    pub header: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub contact: &'static str,
    pub section: &'static str,
    pub section_title: &'static str,
    pub card: &'static str,
    pub layout: LayoutMode,
}

impl StyleParams {
    /// True when no class list is empty.
    pub fn is_complete(&self) -> bool {
        [
            self.accent,
            self.chip,
            self.chip_border,
            self.border,
            self.decoration,
            self.container,
            self.header,
            self.name,
            self.title,
            self.contact,
            self.section,
            self.section_title,
            self.card,
        ]
        .iter()
        .all(|classes| !classes.trim().is_empty())
    }

    /// Classes of the `h1` holding the name.
    ///
    /// The creative name paints its own gradient; the accent colour would
    /// otherwise compete with it.
    pub fn name_classes(&self) -> String {
        match self.template {
            Template::Creative => self.name.to_string(),
            Template::Professional | Template::Minimal => format!("{} {}", self.name, self.accent),
        }
    }

    pub fn section_title_classes(&self) -> String {
        match self.template {
            Template::Creative => self.section_title.to_string(),
            Template::Professional | Template::Minimal => {
                format!("{} {}", self.section_title, self.accent)
            }
        }
    }

    pub fn card_classes(&self) -> String {
        format!("card {} {}", self.card, self.border)
    }

    pub fn chip_classes(&self) -> String {
        format!(
            "chip px-3 py-1 text-xs rounded-full border {} {}",
            self.chip, self.chip_border
        )
    }
}

struct ThemeTokens {
    accent: &'static str,
    chip: &'static str,
    chip_border: &'static str,
    border: &'static str,
    decoration: &'static str,
}

fn theme_tokens(theme: Theme) -> ThemeTokens {
    match theme {
        Theme::Slate => ThemeTokens {
            accent: "text-slate-900",
            chip: "bg-slate-100 text-slate-800",
            chip_border: "border-slate-200",
            border: "border-slate-200",
            decoration: "h-2 bg-gradient-to-r from-slate-700 to-slate-900",
        },
        Theme::Emerald => ThemeTokens {
            accent: "text-emerald-700",
            chip: "bg-emerald-50 text-emerald-800",
            chip_border: "border-emerald-200",
            border: "border-emerald-200",
            decoration: "h-2 bg-gradient-to-r from-emerald-500 to-teal-600",
        },
        Theme::Indigo => ThemeTokens {
            accent: "text-indigo-700",
            chip: "bg-indigo-50 text-indigo-800",
            chip_border: "border-indigo-200",
            border: "border-indigo-200",
            decoration: "h-2 bg-gradient-to-r from-indigo-500 to-purple-600",
        },
        Theme::Rose => ThemeTokens {
            accent: "text-rose-700",
            chip: "bg-rose-50 text-rose-800",
            chip_border: "border-rose-200",
            border: "border-rose-200",
            decoration: "h-2 bg-gradient-to-r from-rose-500 to-pink-600",
        },
    }
}

pub fn resolve(theme: Theme, template: Template) -> StyleParams {
    let t = theme_tokens(theme);
    match template {
        Template::Professional => StyleParams {
            theme,
            template,
            accent: t.accent,
            chip: t.chip,
            chip_border: t.chip_border,
            border: t.border,
            decoration: t.decoration,
            container: "rounded-3xl shadow-lg",
            header: "px-10 py-10 border-b border-slate-200 bg-gradient-to-br from-white to-slate-50",
            name: "text-4xl font-extrabold tracking-tight",
            title: "text-sm text-slate-500 mt-1",
            section: "px-10 py-8 grid gap-10",
            section_title: "text-sm uppercase tracking-wider font-semibold",
            card: "p-4 rounded-xl border",
            contact: "mt-4 flex flex-wrap gap-x-6 gap-y-1 text-sm text-slate-600",
            layout: LayoutMode::Single,
        },
        Template::Minimal => StyleParams {
            theme,
            template,
            accent: t.accent,
            chip: t.chip,
            chip_border: t.chip_border,
            border: t.border,
            decoration: t.decoration,
            container: "rounded-xl shadow-sm",
            header: "px-8 py-8 border-b border-slate-300 bg-white",
            name: "text-3xl font-bold tracking-tight",
            title: "text-sm text-slate-600 mt-1",
            section: "px-8 py-6 grid gap-8",
            section_title: "text-sm font-semibold",
            card: "p-3 rounded-lg border",
            contact: "mt-3 flex flex-wrap gap-x-4 gap-y-1 text-sm text-slate-700",
            layout: LayoutMode::Single,
        },
        Template::Creative => StyleParams {
            theme,
            template,
            accent: t.accent,
            chip: t.chip,
            chip_border: t.chip_border,
            border: t.border,
            decoration: t.decoration,
            container: "rounded-[2rem] shadow-2xl",
            header: "px-12 py-12 border-b-2 border-indigo-200 bg-gradient-to-br from-indigo-50 via-white to-purple-50",
            name: "text-5xl font-black tracking-tight bg-gradient-to-r from-indigo-600 to-purple-600 bg-clip-text text-transparent",
            title: "text-base text-indigo-600 mt-2 font-medium",
            section: "px-12 py-10 grid gap-12",
            section_title: "text-lg font-bold text-indigo-700 uppercase tracking-widest",
            card: "p-6 rounded-2xl border-2 bg-gradient-to-br from-white to-indigo-50",
            contact: "mt-6 flex flex-wrap gap-x-8 gap-y-2 text-base text-indigo-700 font-medium",
            layout: LayoutMode::Modern,
        },
    }
}
