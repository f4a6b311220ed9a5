use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────────────────────────────────────

/// Stable identifier of a collection entry.
///
/// Assigned once when the entry is created and never regenerated, so removal
/// and update keep targeting the same entry when the list reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        EntityId(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Common behaviour of experience, project and education entries.
pub trait Entity: Clone {
    fn id(&self) -> EntityId;

    /// `verified` is user-asserted; absent counts as not verified.
    fn is_verified(&self) -> bool;
}

// ────────────────────────────────────────────────────────────────────────────
// Theme & template
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Slate,
    Emerald,
    Indigo,
    Rose,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Slate, Theme::Emerald, Theme::Indigo, Theme::Rose];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Slate => "slate",
            Theme::Emerald => "emerald",
            Theme::Indigo => "indigo",
            Theme::Rose => "rose",
        }
    }

    /// Short tagline shown next to the colour swatch in the design step.
    pub fn description(&self) -> &'static str {
        match self {
            Theme::Slate => "Professional & Classic",
            Theme::Emerald => "Fresh & Energetic",
            Theme::Indigo => "Modern & Tech",
            Theme::Rose => "Creative & Warm",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                kind: "theme",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Professional,
    Minimal,
    Creative,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Professional, Template::Minimal, Template::Creative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Professional => "professional",
            Template::Minimal => "minimal",
            Template::Creative => "creative",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::Professional => {
                "Clean corporate design with bold header - Perfect for traditional industries"
            }
            Template::Minimal => "Simple and elegant layout - Ideal for creative professionals",
            Template::Creative => "Modern design with visual flair - Stand out from the crowd",
        }
    }

    pub fn features(&self) -> [&'static str; 3] {
        match self {
            Template::Professional => ["ATS Optimized", "Corporate Style", "Bold Header"],
            Template::Minimal => ["Clean Layout", "Easy to Read", "Versatile"],
            Template::Creative => ["Eye-Catching", "Modern Design", "Unique Style"],
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                kind: "template",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Ordered set of skill tags. Display order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a trimmed skill. Returns `false` for blank input or a duplicate.
    pub fn insert(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.contains(skill) {
            return false;
        }
        self.0.push(skill.to_string());
        true
    }

    pub fn remove(&mut self, skill: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|s| s != skill);
        self.0.len() != before
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: EntityId,
    pub company: String,
    pub role: String,
    pub start: String,
    pub end: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl Experience {
    /// A blank entry with a freshly minted id, as created by "Add New".
    pub fn blank() -> Self {
        Experience {
            id: EntityId::new(),
            company: String::new(),
            role: String::new(),
            start: String::new(),
            end: String::new(),
            summary: String::new(),
            verified: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl Project {
    pub fn blank() -> Self {
        Project {
            id: EntityId::new(),
            name: String::new(),
            description: String::new(),
            link: None,
            verified: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: EntityId,
    pub school: String,
    pub degree: String,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl Education {
    pub fn blank() -> Self {
        Education {
            id: EntityId::new(),
            school: String::new(),
            degree: String::new(),
            start: String::new(),
            end: String::new(),
            verified: None,
        }
    }
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> EntityId {
                    self.id
                }

                fn is_verified(&self) -> bool {
                    self.verified == Some(true)
                }
            }
        )*
    };
}

impl_entity!(Experience, Project, Education);

// ────────────────────────────────────────────────────────────────────────────
// Aggregate
// ────────────────────────────────────────────────────────────────────────────

/// The whole resume. One live instance per session, replaced wholesale on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeData {
    pub name: String,
    pub title: String,
    pub about: String,
    pub contact: Contact,
    pub skills: SkillSet,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub theme: Theme,
    pub template: Template,
}

impl Default for ResumeData {
    fn default() -> Self {
        ResumeData {
            name: String::new(),
            title: String::new(),
            about: String::new(),
            contact: Contact::default(),
            skills: SkillSet::new(),
            experiences: Vec::new(),
            projects: Vec::new(),
            education: Vec::new(),
            theme: Theme::Indigo,
            template: Template::Professional,
        }
    }
}
