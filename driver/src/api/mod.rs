pub mod client;
pub mod mock;
