pub use super::anime::Entity as Anime;
pub use super::api_keys::Entity as ApiKeys;
pub use super::api_usage::Entity as ApiUsage;
