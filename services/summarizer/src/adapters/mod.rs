pub mod credentials;
pub mod http;

pub use credentials::StaticCredentialSource;
pub use http::HttpSummaryAdapter;
