//! Game implementations.

pub mod qwixx;
