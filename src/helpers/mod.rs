//! Helper functions shared by the resolver, the CLI and the server

mod date;
mod url;

pub use date::*;
pub use url::*;
