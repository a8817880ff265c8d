/// Command and message handlers
pub mod handlers;
/// Common messaging utilities (split long messages, formatting)
pub mod messaging;
