pub mod gate;
#[cfg(feature = "transport-http")]
pub mod http;
pub mod in_memory;
pub mod rate_limit;
