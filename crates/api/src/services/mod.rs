//! Service wiring for the HTTP process.

pub mod notification;

pub use notification::MetricsNotificationSink;
