//! Request middleware: session plumbing and the inactivity guard.

pub mod inactivity;
pub mod session;

pub use inactivity::auto_logout;
pub use session::create_session_layer;
