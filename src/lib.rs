//! containerize - publish a .NET project as a container image
//!
//! The [`wizard`] module is a reusable multi-step prompt engine; the
//! [`container`] module uses it to collect container metadata and turns the
//! answers into dotnet commands.

pub mod config;
pub mod container;
pub mod logging;
pub mod ui;
pub mod wizard;
