pub mod datetime;
pub mod extractor;
pub mod file_magic;
pub mod filename;
pub mod jwt;
pub mod multipart;
pub mod parameter_error_handler;
pub mod password;
pub mod validate;

pub use datetime::{parse_iso_date, parse_iso_datetime};
pub use extractor::CurrentUser;
pub use file_magic::validate_magic_bytes;
pub use filename::{file_extension, secure_filename};
pub use jwt::{TokenError, TokenService};
pub use multipart::{MultipartForm, read_multipart};
pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};
