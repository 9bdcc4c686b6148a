//! HTTP request handlers.

pub mod ldp;

pub use ldp::dispatch;
