//! Hall Scout math utilities.

pub mod math;

pub use math::binomial;
pub use math::describe::*;
pub use math::stable::*;
