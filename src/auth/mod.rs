//! Token handling and route protection.

pub mod guard;
pub mod token;
