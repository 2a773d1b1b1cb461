pub mod backend;
pub mod command_renderer;
pub mod renderer;

pub use backend::{select_backend, RenderBackend};
pub use command_renderer::CommandRenderer;
pub use renderer::{Container, OutputSettings, RenderJob, Renderer, VideoCodec};
