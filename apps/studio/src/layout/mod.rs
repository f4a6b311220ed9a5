// Print layout: font metrics, continuous block/row flow, pagination.
// CPU-bound; the export pipeline runs it inside tokio::task::spawn_blocking.

pub mod flow;
pub mod font_metrics;
pub mod page;
pub mod paginate;
