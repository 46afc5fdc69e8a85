pub mod handler;
pub mod method;
pub mod notifier;
