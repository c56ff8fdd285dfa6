//! View math shared by the tour loader and the viewer session.

pub mod camera;
pub mod cube;
pub mod orientation;
pub mod time;

pub use camera::{ViewLimits, ViewParameters, Viewport};
pub use cube::{CubeFace, FacePixel};
