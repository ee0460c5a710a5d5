// Library root — shared by both binaries and the integration tests.
// The local entry point is src/main.rs; the Lambda entry point is src/bin/gameday-lambda.rs.

pub mod config;
pub mod driver;
pub mod error;
pub mod handler;
pub mod logger;

#[cfg(test)]
mod test_support;
