pub mod error;
pub mod geometry;
pub mod input;
pub mod time;
pub mod watch;

pub use error::LoadError;
pub use geometry::Rect;
