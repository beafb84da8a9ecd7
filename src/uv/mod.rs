//! uv (environment manager) interaction module.

mod detect;
mod executor;

pub use detect::find_uv;
pub use executor::UvExecutor;
