pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use client::{build_client, download_to_file, fetch, send_page};
pub use errors::FetchError;
pub use types::PageResponse;
