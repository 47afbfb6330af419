//! Background job scheduler and job implementations.

mod alert_cleanup;
mod scheduler;
mod tracking_tick;

pub use alert_cleanup::AlertCleanupJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use tracking_tick::TrackingTickJob;
