//! GPU recolor path (`gpu` feature).

pub(crate) mod context;
pub(crate) mod executor;
pub(crate) mod recolor;
pub(crate) mod scoped;
pub(crate) mod shader;
pub(crate) mod worker;

pub use context::{FRAME_FORMAT, GpuContext, GpuFrame};
pub use executor::GpuRecolor;
pub use recolor::RecolorRenderer;
pub use shader::recolor_wgsl;
pub use worker::GpuWorker;
