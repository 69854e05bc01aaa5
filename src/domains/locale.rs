pub mod dto;
pub mod handlers;

pub use handlers::{get_locale, list_locales, locale_support, negotiate_locale};
