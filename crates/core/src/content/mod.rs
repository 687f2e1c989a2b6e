pub mod model;
pub mod resolver;

pub use model::{ContentEntry, TextStyle, TextStyleRow, UpsertContent, UpsertTextStyle};
pub use resolver::{ContentSet, InlineStyle, ResolvedField, ResolvedPage};
