//! Real-time plumbing and audio output for pulsetracker.
//!
//! [`engine_link`] splits an engine into a control handle and an audio
//! thread half connected by lock-free queues; [`CpalOutput`] drives the
//! audio half from the system's default output device.

mod cpal_backend;
mod link;
mod traits;

pub use cpal_backend::CpalOutput;
pub use link::{engine_link, ControlLink, RealtimeEngine, RingSink, BLOCK_SIZE};
pub use traits::{AudioError, AudioOutput};
