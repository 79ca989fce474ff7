pub mod db;
pub mod environment;
pub mod extract;
pub mod lexical;
pub mod logging;
pub mod names;
pub mod pipeline;
pub mod records;
pub mod reports;

pub const TARGET_EXTRACT: &str = "extract";
pub const TARGET_INDEX: &str = "index";
pub const TARGET_GROUND: &str = "ground";
pub const TARGET_DB: &str = "db_query";
