//! Content resolution core for the brand site CMS.
//!
//! Flat page fields with text-style overrides, structured page sections,
//! page-builder blocks with visibility rules and animation, and block
//! version history. Storage sits behind [`store::ContentStore`].

pub mod animation;
pub mod block;
pub mod content;
pub mod events;
pub mod json;
pub mod media;
pub mod mutation;
pub mod section;
pub mod store;
pub mod version;
pub mod visibility;
