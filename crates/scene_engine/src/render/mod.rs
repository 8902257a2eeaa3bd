//! # Rendering
//!
//! The engine does not own a graphics backend. It draws through the
//! [`Canvas`] trait, which hosts implement over whatever drawing library they
//! use. [`RecordingCanvas`] is a backend-free implementation that records
//! [`DrawCommand`]s.

pub mod canvas;
pub mod commands;

pub use canvas::Canvas;
pub use commands::{DrawCommand, RecordingCanvas};
