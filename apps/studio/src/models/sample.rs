//! Content the session starts with, so the preview is never blank on first paint.

use crate::models::resume::{
    Contact, Education, EntityId, Experience, Project, ResumeData, SkillSet, Template, Theme,
};

pub fn sample_resume() -> ResumeData {
    ResumeData {
        name: "Priyanshu Sharma".to_string(),
        title: "Full-Stack Developer".to_string(),
        about: "Passionate about building connected learning ecosystems. Focused on delightful UX \
                and robust engineering."
            .to_string(),
        contact: Contact {
            email: "priyanshu@example.com".to_string(),
            phone: "+91-98765-43210".to_string(),
            location: "India".to_string(),
            website: Some("https://portfolio.example.com".to_string()),
        },
        skills: SkillSet::from_iter([
            "React",
            "TypeScript",
            "Tailwind",
            "Node.js",
            "Express",
            "MongoDB",
        ]),
        experiences: vec![Experience {
            id: EntityId::new(),
            company: "Innovate Labs".to_string(),
            role: "Frontend Engineer".to_string(),
            start: "2023".to_string(),
            end: "Present".to_string(),
            summary: "Led development of resume builder UI with real-time updates from platform \
                      activities."
                .to_string(),
            verified: None,
        }],
        projects: vec![Project {
            id: EntityId::new(),
            name: "Hackathon Hub".to_string(),
            description: "Platform to manage hackathons with team formation and scoring."
                .to_string(),
            link: Some("https://github.com/example/hackathon-hub".to_string()),
            verified: Some(true),
        }],
        education: vec![Education {
            id: EntityId::new(),
            school: "ABC University".to_string(),
            degree: "B.Tech CSE".to_string(),
            start: "2019".to_string(),
            end: "2023".to_string(),
            verified: None,
        }],
        theme: Theme::Indigo,
        template: Template::Professional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;

    #[test]
    fn test_sample_has_every_section_populated() {
        let data = sample_resume();
        assert!(!data.name.is_empty());
        assert_eq!(data.skills.len(), 6);
        assert_eq!(data.experiences.len(), 1);
        assert_eq!(data.projects.len(), 1);
        assert_eq!(data.education.len(), 1);
        assert!(data.projects[0].is_verified());
        assert_eq!(data.theme, Theme::Indigo);
        assert_eq!(data.template, Template::Professional);
    }
}
