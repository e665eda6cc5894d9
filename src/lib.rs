pub mod config;
pub mod core;
pub mod error;
pub mod playback;
pub mod render;
pub mod scheduler;
pub mod sim;

pub use crate::core::{Event, Frame};
pub use error::{Error, Result};
pub use scheduler::{Algorithm, Policy};
pub use sim::{simulate, ProcessSpec, Sim, SimulationResult};
