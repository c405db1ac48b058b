/// Command and message handlers
pub mod handlers;
/// Reply shapes and Telegram rendering
pub mod reply;
/// Message text to reply mapping
pub mod responder;

pub use responder::LinkResponder;
