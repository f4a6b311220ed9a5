use serde::{Deserialize, Serialize};

use crate::models::{
    Education, Entity, EntityId, Experience, Project, ResumeData, Template, Theme,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Name,
    Title,
    About,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Email,
    Phone,
    Location,
    Website,
}

/// One user edit. Every variant is a total function over `ResumeData`.
///
/// JSON form: `{"kind": "add_skill", "data": "Rust"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Edit {
    SetText { field: TextField, value: String },
    SetContact { field: ContactField, value: String },
    AddSkill(String),
    RemoveSkill(String),
    AddExperience(Experience),
    UpdateExperience(Experience),
    RemoveExperience(EntityId),
    AddProject(Project),
    UpdateProject(Project),
    RemoveProject(EntityId),
    AddEducation(Education),
    UpdateEducation(Education),
    RemoveEducation(EntityId),
    SetTheme(Theme),
    SetTemplate(Template),
}

impl Edit {
    pub fn apply(self, mut data: ResumeData) -> ResumeData {
        match self {
            Edit::SetText { field, value } => match field {
                TextField::Name => data.name = value,
                TextField::Title => data.title = value,
                TextField::About => data.about = value,
            },
            Edit::SetContact { field, value } => match field {
                ContactField::Email => data.contact.email = value,
                ContactField::Phone => data.contact.phone = value,
                ContactField::Location => data.contact.location = value,
                // An emptied website input means "no website".
                ContactField::Website => {
                    data.contact.website = (!value.trim().is_empty()).then_some(value)
                }
            },
            Edit::AddSkill(skill) => {
                data.skills.insert(&skill);
            }
            Edit::RemoveSkill(skill) => {
                data.skills.remove(&skill);
            }
            Edit::AddExperience(entry) => push_unique(&mut data.experiences, entry),
            Edit::UpdateExperience(entry) => update_by_id(&mut data.experiences, entry),
            Edit::RemoveExperience(id) => remove_by_id(&mut data.experiences, id),
            Edit::AddProject(entry) => push_unique(&mut data.projects, entry),
            Edit::UpdateProject(entry) => update_by_id(&mut data.projects, entry),
            Edit::RemoveProject(id) => remove_by_id(&mut data.projects, id),
            Edit::AddEducation(entry) => push_unique(&mut data.education, entry),
            Edit::UpdateEducation(entry) => update_by_id(&mut data.education, entry),
            Edit::RemoveEducation(id) => remove_by_id(&mut data.education, id),
            Edit::SetTheme(theme) => data.theme = theme,
            Edit::SetTemplate(template) => data.template = template,
        }
        data
    }
}

/// Appends unless an entry with the same id already exists (ids are never reused).
fn push_unique<T: Entity>(items: &mut Vec<T>, entry: T) {
    if items.iter().all(|e| e.id() != entry.id()) {
        items.push(entry);
    }
}

/// Replaces the entry carrying the same id in place; unknown ids are ignored.
fn update_by_id<T: Entity>(items: &mut [T], entry: T) {
    if let Some(slot) = items.iter_mut().find(|e| e.id() == entry.id()) {
        *slot = entry;
    }
}

fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: EntityId) {
    items.retain(|e| e.id() != id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_resume;

    fn three_experiences() -> (ResumeData, Vec<EntityId>) {
        let mut data = ResumeData::default();
        let mut ids = Vec::new();
        for role in ["First", "Second", "Third"] {
            let mut e = Experience::blank();
            e.role = role.to_string();
            ids.push(e.id);
            data = Edit::AddExperience(e).apply(data);
        }
        (data, ids)
    }

    #[test]
    fn test_edits_parse_from_json_list() {
        let raw = r#"[
            {"kind": "set_text", "data": {"field": "name", "value": "Grace Hopper"}},
            {"kind": "set_contact", "data": {"field": "website", "value": " "}},
            {"kind": "add_skill", "data": "COBOL"},
            {"kind": "set_theme", "data": "emerald"}
        ]"#;
        let edits: Vec<Edit> = serde_json::from_str(raw).unwrap();
        assert_eq!(edits[2], Edit::AddSkill("COBOL".into()));

        let data = edits.into_iter().fold(sample_resume(), |d, e| e.apply(d));
        assert_eq!(data.name, "Grace Hopper");
        assert_eq!(data.contact.website, None);
        assert_eq!(data.skills.iter().last(), Some("COBOL"));
        assert_eq!(data.theme, Theme::Emerald);
    }

    #[test]
    fn test_add_skill_trims_and_dedupes() {
        let data = sample_resume();
        let before = data.skills.len();
        let data = Edit::AddSkill("  React ".to_string()).apply(data);
        assert_eq!(data.skills.len(), before);
        let data = Edit::AddSkill(" Rust ".to_string()).apply(data);
        assert_eq!(data.skills.len(), before + 1);
        assert_eq!(data.skills.iter().last(), Some("Rust"));
    }

    #[test]
    fn test_remove_by_id_targets_the_right_entry_after_reorder() {
        let (mut data, ids) = three_experiences();
        data.experiences.reverse();
        let data = Edit::RemoveExperience(ids[1]).apply(data);
        let roles: Vec<_> = data.experiences.iter().map(|e| e.role.as_str()).collect();
        assert_eq!(roles, vec!["Third", "First"]);
    }

    #[test]
    fn test_update_keeps_position_and_id() {
        let (data, ids) = three_experiences();
        let mut edited = data.experiences[1].clone();
        edited.company = "Analytical Engines".to_string();
        let data = Edit::UpdateExperience(edited).apply(data);
        assert_eq!(data.experiences[1].id, ids[1]);
        assert_eq!(data.experiences[1].company, "Analytical Engines");
        assert_eq!(data.experiences.len(), 3);
    }

    #[test]
    fn test_update_with_unknown_id_is_a_no_op() {
        let (data, _) = three_experiences();
        let stranger = Experience::blank();
        let after = Edit::UpdateExperience(stranger).apply(data.clone());
        assert_eq!(after, data);
    }

    #[test]
    fn test_adding_same_entry_twice_does_not_duplicate_id() {
        let project = Project::blank();
        let data = Edit::AddProject(project.clone()).apply(ResumeData::default());
        let data = Edit::AddProject(project).apply(data);
        assert_eq!(data.projects.len(), 1);
    }

    #[test]
    fn test_blank_website_clears_link() {
        let data = sample_resume();
        let data = Edit::SetContact {
            field: ContactField::Website,
            value: "   ".to_string(),
        }
        .apply(data);
        assert_eq!(data.contact.website, None);
    }

    #[test]
    fn test_set_theme_and_template() {
        let data = Edit::SetTheme(Theme::Emerald).apply(ResumeData::default());
        let data = Edit::SetTemplate(Template::Creative).apply(data);
        assert_eq!(data.theme, Theme::Emerald);
        assert_eq!(data.template, Template::Creative);
    }
}
