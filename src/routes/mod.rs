//! Route modules for the Marginalia server

pub mod health;
pub mod highlights;
pub mod readings;
pub mod render;
