//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod replay;

pub(crate) use render::RenderArgs;
pub(crate) use replay::ReplayArgs;
