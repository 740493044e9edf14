//! Text change detection used to carry carets across DOM mutations

mod delta;

pub use delta::{diff, TextDelta};
