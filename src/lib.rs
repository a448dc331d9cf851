pub mod assets;
pub mod cms;
pub mod collection;
pub mod config;
pub mod content;
pub mod generator;
pub mod logger;
pub mod nav;
pub mod paginator;
pub mod server;
pub mod text_utils;
pub mod theme;
pub mod util;
pub mod view;

mod test_data;
