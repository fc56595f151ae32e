//! Controller layer: UI events, upload session transitions, and command
//! orchestration.

pub mod events;
pub mod orchestration;
pub mod session;
