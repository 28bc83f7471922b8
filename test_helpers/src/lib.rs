//! Test helpers shared by the crates in the `extprops` workspace.
//!
//! - [`env`] mutates process environment variables behind RAII guards.
//! - [`figment`] runs closures inside a `figment::Jail`.

pub mod env;
pub mod figment;
