pub mod error;
pub mod hash;
pub mod rate_limiter;
pub mod types;
