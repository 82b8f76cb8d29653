//! Configuration module

mod site;

pub use site::DefaultsConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
