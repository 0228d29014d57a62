pub mod http;

pub use http::{HttpRegistrationClient, HttpRegistrationConfig};
