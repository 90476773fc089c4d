pub mod data_dir;
pub mod loader;

pub use data_dir::*;
pub use loader::*;
