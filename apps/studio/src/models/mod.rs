pub mod resume;
pub mod sample;

pub use resume::{Education, Entity, EntityId, Experience, Project, ResumeData, Template, Theme};
pub use sample::sample_resume;
