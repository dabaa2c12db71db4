//! Traffic Light Library
//!
//! A blocking handoff queue and a traffic light actor that publishes its
//! phase changes through it.

pub mod simulation;
