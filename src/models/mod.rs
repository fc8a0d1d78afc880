//! Data models for the volunteer management application.
//!
//! These models match the frontend interfaces exactly for seamless interoperability.

mod post;
mod request;

pub use post::*;
pub use request::*;
