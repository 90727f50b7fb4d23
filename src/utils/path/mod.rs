//! Path and route utilities.
//!
//! Pure functions for path manipulation, plus a staged atomic writer.
//!
//! - [`fs`]: Filesystem paths (`normalize_path`, `resolve_from`, `StagedFile`)
//! - [`route`]: Routes and links (`join_route`, `is_external_link`)

pub mod fs;
pub mod route;

pub use fs::{StagedFile, normalize_path, resolve_from};
