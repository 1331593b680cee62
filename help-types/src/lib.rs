pub mod errors;
pub mod execution;
pub mod help;
pub mod messages;
pub mod problem;
pub mod session;
pub mod stats;
pub mod user;

// Re-export all types
pub use errors::*;
pub use execution::*;
pub use help::*;
pub use messages::*;
pub use problem::*;
pub use session::*;
pub use stats::*;
pub use user::*;

pub type UserId = String;
pub type RequestId = String;
pub type SessionId = String;
pub type ProblemId = String;
pub type RoomId = String;
