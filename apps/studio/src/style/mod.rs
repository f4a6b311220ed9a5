// Style resolution: theme/template parameters, the utility-class vocabulary,
// typed stylesheets and the cascade that turns them into computed styles.

pub mod cascade;
pub mod palette;
pub mod resolver;
pub mod sheet;
pub mod utility;

pub use resolver::{resolve, LayoutMode, StyleParams};
