//! Command implementations that need more than a service call.

pub mod init;
