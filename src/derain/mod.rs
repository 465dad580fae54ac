//! Deraining service integration.
//!
//! The model itself lives behind [`DerainService`]. [`ProcessingChannel`]
//! runs a request off the UI loop and hands the outcome back to `update()`.

mod channel;
mod service;
mod simulated;
mod timer;

pub use channel::ProcessingChannel;
pub use service::DerainService;
pub use simulated::SimulatedDerainService;
