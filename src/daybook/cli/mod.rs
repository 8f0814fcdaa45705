//! # CLI Layer
//!
//! One possible client of the daybook library. Argument parsing lives in
//! `setup`, dispatch in `commands`, output in `render` and `styles`.

mod commands;
mod render;
mod setup;
mod styles;

pub use commands::run;
