use serde::{Deserialize, Serialize};

use crate::models::ResumeData;

/// Editor wizard steps, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Basic,
    About,
    Experience,
    Projects,
    Education,
    Template,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Basic,
        Step::About,
        Step::Experience,
        Step::Projects,
        Step::Education,
        Step::Template,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Step::Basic => "Basic Info",
            Step::About => "Summary",
            Step::Experience => "Experience",
            Step::Projects => "Projects",
            Step::Education => "Education",
            Step::Template => "Design",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Step::Basic => "Your personal and contact information",
            Step::About => "Professional summary and skills",
            Step::Experience => "Your work history and achievements",
            Step::Projects => "Showcase your best work",
            Step::Education => "Academic background and certifications",
            Step::Template => "Customize your resume appearance",
        }
    }

    fn index(&self) -> usize {
        Step::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Next step, staying put on the last one.
    pub fn next(self) -> Step {
        Step::ALL.get(self.index() + 1).copied().unwrap_or(self)
    }

    pub fn is_complete(&self, data: &ResumeData) -> bool {
        match self {
            Step::Basic => {
                !data.name.trim().is_empty()
                    && !data.title.trim().is_empty()
                    && !data.contact.email.trim().is_empty()
            }
            Step::About => !data.about.trim().is_empty() && !data.skills.is_empty(),
            Step::Experience => !data.experiences.is_empty(),
            Step::Projects => !data.projects.is_empty(),
            Step::Education => !data.education.is_empty(),
            Step::Template => true,
        }
    }
}

/// True once every step is complete.
pub fn all_steps_complete(data: &ResumeData) -> bool {
    Step::ALL.iter().all(|s| s.is_complete(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_resume;

    #[test]
    fn test_navigation_clamps_at_last_step() {
        assert_eq!(Step::Basic.next(), Step::About);
        assert_eq!(Step::Education.next(), Step::Template);
        assert_eq!(Step::Template.next(), Step::Template);
    }

    #[test]
    fn test_step_completion_tracks_data() {
        let mut data = sample_resume();
        assert!(all_steps_complete(&data));
        data.skills = Default::default();
        assert!(!Step::About.is_complete(&data));
        assert!(Step::Template.is_complete(&data));
        assert!(!all_steps_complete(&data));
    }
}
