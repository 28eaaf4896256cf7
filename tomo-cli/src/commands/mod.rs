//! CLI command implementations

mod build;
mod info;
mod validate;

pub use build::{build, BuildArgs};
pub use info::info;
pub use validate::validate;
