pub mod client;
pub mod error;
pub mod window;

pub use client::{ZipkinClient, dependencies_url};
pub use error::FetchError;
pub use window::QueryWindow;
