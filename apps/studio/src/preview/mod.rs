// Live preview: the visual tree, the renderer that builds it from resume data,
// the page shell and HTML serialisation.

pub mod html;
pub mod page;
pub mod renderer;
pub mod tree;

pub use page::{render_page, Document};
pub use renderer::render;
pub use tree::VisualTree;
