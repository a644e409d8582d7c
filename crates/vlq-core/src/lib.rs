pub mod config;
pub mod logging;

pub mod clock;
pub mod query;
pub mod query_url;
pub mod template;
