//! Wire3D Core Library - wireframe projection and per-frame rendering
//!
//! Shapes are plain vertex/edge lists. A non-rotating observer looks through
//! a window parallel to the XY plane; every frame the scene projects each
//! vertex onto that window and hands the resulting 2D segments to a
//! display surface supplied by the host.

pub mod config;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod scene;
pub mod surface;

// Re-export commonly used types
pub use config::RenderConfig;
pub use error::{ConfigError, GeometryError, SurfaceError};
pub use geometry::{Edge, Shape};
pub use projection::Projector;
pub use scene::{FrameStats, Observer, Scene, SceneState};
pub use surface::{DisplaySurface, LineHandle, MemorySurface, Segment, Viewport};
