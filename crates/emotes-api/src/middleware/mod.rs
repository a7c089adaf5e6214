pub mod error_detail;
pub mod rate_limit;
pub mod security_headers;

pub use error_detail::error_detail_middleware;
pub use rate_limit::rate_limit_middleware;
pub use security_headers::{security_headers_middleware, SecurityHeadersConfig};
