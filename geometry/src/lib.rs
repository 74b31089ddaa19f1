#![deny(clippy::all)]
#![allow(dead_code)]

pub mod coord2d;

/// Data type used for coordinates
pub type Position = i32;
