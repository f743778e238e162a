//! Configuration module

mod site;

pub use site::ConfigError;
pub use site::MenuItem;
pub use site::Profile;
pub use site::SiteConfig;
pub use site::SocialLink;
