pub mod app;
pub mod config;
pub mod error;
pub mod jobs;
pub mod lifecycle;
pub mod middleware;
pub mod routes;
pub mod services;

#[cfg(test)]
mod test_support;
