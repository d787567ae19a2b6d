pub mod files;
pub mod ranks;
pub mod tables;
pub mod types;

pub use files::*;
pub use ranks::*;
pub use tables::*;
pub use types::*;
