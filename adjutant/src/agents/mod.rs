//! Planner and presenter roles that talk to the inference gateway.

pub mod planner;
pub mod presenter;
