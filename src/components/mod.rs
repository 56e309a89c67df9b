//! UI components.

pub mod hero_canvas;
