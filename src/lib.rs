pub mod archive;
pub mod config;
pub mod explorer;
pub mod util;
