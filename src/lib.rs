pub mod canvas;
pub mod config;
pub mod error;
pub mod fireworks;
pub mod particle;
pub mod show;
pub mod stars;
pub mod viewport;

pub use canvas::{Canvas, PainterCanvas, RecordingCanvas};
pub use config::FireworksConfig;
pub use error::ConfigError;
pub use fireworks::Fireworks;
pub use particle::{Particle, create_burst};
pub use show::{ScheduledBurst, ShowSequence};
pub use stars::{Star, StarField};
pub use viewport::Viewport;
