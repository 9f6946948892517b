pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod subjects;
pub mod submissions;
pub mod users;

pub use common::response::{ErrorResponse, MessageResponse};
