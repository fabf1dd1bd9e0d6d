pub mod config;
pub mod error;
pub mod http_cache;
pub mod http_client;
pub mod lookup;
pub mod name_matcher;
pub mod nba_fetch;
pub mod prop_line;
pub mod report_export;
pub mod state;
pub mod stats;
pub mod tables;
