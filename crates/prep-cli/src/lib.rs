//! Library side of the `prep-admin` CLI.

pub mod logging;
pub mod render;
pub mod settings;
