pub mod config;
pub mod locale;
