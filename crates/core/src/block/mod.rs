pub mod html;
pub mod model;
pub mod render;
pub mod settings;
pub mod validate;
pub mod video;

pub use model::{BlockKind, BlockOrder, BlockUpdate, NewPageBlock, PageBlock};
pub use render::{
    render, render_page, BlockAction, BlockNode, FailedBlock, RenderContext, RenderError,
    RenderNode, RenderedBlock,
};
