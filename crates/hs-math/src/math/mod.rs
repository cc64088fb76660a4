//! Core math modules.

pub mod binomial;
pub mod describe;
pub mod stable;
