pub mod configuration;
pub mod provider;
pub mod schema;
pub mod template;
