use serde::{Deserialize, Serialize};

use crate::models::ResumeData;

pub const TOTAL_SECTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoredField {
    Name,
    Title,
    Email,
    About,
    Skills,
    Experience,
    Projects,
    Education,
}

/// Points awarded per filled field; they add up to 100.
const FIELD_WEIGHTS: &[(ScoredField, u8)] = &[
    (ScoredField::Name, 7),
    (ScoredField::Title, 7),
    (ScoredField::Email, 6),
    (ScoredField::About, 10),
    (ScoredField::Skills, 10),
    (ScoredField::Experience, 20),
    (ScoredField::Projects, 20),
    (ScoredField::Education, 20),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub percent: u8,
    pub filled_sections: usize,
    pub total_sections: usize,
    pub missing: Vec<ScoredField>,
}

fn is_filled(data: &ResumeData, field: ScoredField) -> bool {
    match field {
        ScoredField::Name => !data.name.trim().is_empty(),
        ScoredField::Title => !data.title.trim().is_empty(),
        ScoredField::Email => !data.contact.email.trim().is_empty(),
        ScoredField::About => !data.about.trim().is_empty(),
        ScoredField::Skills => !data.skills.is_empty(),
        ScoredField::Experience => !data.experiences.is_empty(),
        ScoredField::Projects => !data.projects.is_empty(),
        ScoredField::Education => !data.education.is_empty(),
    }
}

pub fn completeness_percent(data: &ResumeData) -> u8 {
    let score: u32 = FIELD_WEIGHTS
        .iter()
        .filter(|(field, _)| is_filled(data, *field))
        .map(|(_, points)| *points as u32)
        .sum();
    score.min(100) as u8
}

/// Sections counted as done: basic info, summary+skills, and the three collections.
pub fn filled_sections(data: &ResumeData) -> usize {
    let basic = is_filled(data, ScoredField::Name)
        && is_filled(data, ScoredField::Title)
        && is_filled(data, ScoredField::Email);
    let about = is_filled(data, ScoredField::About) && is_filled(data, ScoredField::Skills);
    [
        basic,
        about,
        is_filled(data, ScoredField::Experience),
        is_filled(data, ScoredField::Projects),
        is_filled(data, ScoredField::Education),
    ]
    .into_iter()
    .filter(|done| *done)
    .count()
}

pub fn compute_completeness_report(data: &ResumeData) -> CompletenessReport {
    let missing = FIELD_WEIGHTS
        .iter()
        .map(|(field, _)| *field)
        .filter(|field| !is_filled(data, *field))
        .collect();

    CompletenessReport {
        percent: completeness_percent(data),
        filled_sections: filled_sections(data),
        total_sections: TOTAL_SECTIONS,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_resume;

    #[test]
    fn test_weights_sum_to_one_hundred() {
        let total: u32 = FIELD_WEIGHTS.iter().map(|(_, w)| *w as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_sample_is_complete() {
        let data = sample_resume();
        assert_eq!(completeness_percent(&data), 100);
        assert_eq!(filled_sections(&data), TOTAL_SECTIONS);
        assert!(compute_completeness_report(&data).missing.is_empty());
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let data = ResumeData::default();
        assert_eq!(completeness_percent(&data), 0);
        assert_eq!(filled_sections(&data), 0);
        assert_eq!(compute_completeness_report(&data).missing.len(), 8);
    }

    #[test]
    fn test_whitespace_only_fields_do_not_count() {
        let mut data = sample_resume();
        data.name = "   ".to_string();
        data.projects.clear();
        assert_eq!(completeness_percent(&data), 100 - 7 - 20);
        // basic info needs name, title and email
        assert_eq!(filled_sections(&data), 3);
    }
}
