//! Relay domain - run status, polling decisions, emitted events and the
//! inbound request descriptor.

mod events;
mod poll;
mod request;
mod run_status;

pub use events::RelayEvent;
pub use poll::{PollPhase, PollPolicy};
pub use request::{RelayRequest, RequestValidationError};
pub use run_status::RunStatus;
