//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::GithubConfig;
pub use site::HitokotoConfig;
pub use site::MusicConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::SiteInfo;
pub use site::SnowConfig;
