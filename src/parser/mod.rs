pub mod list;
pub mod record;

pub use list::*;
pub use record::*;
