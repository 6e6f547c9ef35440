#[macro_use]
extern crate derive_more;

pub mod area;
pub mod basic;
pub mod creature;
pub mod error;
pub mod movement;
pub mod pathfinding;
pub mod rules;

pub use error::{Error, ErrorType, Result};
