//! Shared utilities for the WORM farmer.

pub mod logging;
pub mod net;
pub mod retry;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use net::mask_rpc_url;
pub use retry::{retry_with_backoff, RetryExhausted, RetryPolicy};
pub use time::format_duration;
