#[macro_use]
pub mod macros;

pub mod api;
pub mod audio_parser;
pub mod config;
pub mod embedded_script;
pub mod episode_list_parser;
pub mod episode_page_parser;
pub mod schema;
