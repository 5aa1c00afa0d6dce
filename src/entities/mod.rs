pub mod prelude;

pub mod anime;
pub mod api_keys;
pub mod api_usage;
