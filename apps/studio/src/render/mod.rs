// Output backends for the paginated display list.

pub mod pdf;
