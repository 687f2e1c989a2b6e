pub mod model;

pub use model::{latest_version_number, next_version_number, BlockVersion};
