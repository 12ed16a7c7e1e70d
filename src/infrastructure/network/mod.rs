pub mod client;
pub mod http;
pub mod probe;
