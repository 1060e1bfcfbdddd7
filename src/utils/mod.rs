pub mod output_path;
pub use output_path::{MAX_PREFIX_LENGTH, timestamped_output_path};
pub mod url_validation;
pub use url_validation::{UrlValidationError, join_endpoint, validate_host_url};
