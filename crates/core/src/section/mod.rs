pub mod completeness;
pub mod model;

pub use completeness::{PageCompleteness, SectionCompleteness};
pub use model::{NewPageSection, PageSection, UpdatePageSection};
