pub mod csv;
pub mod schema_gen;
pub mod sqlite;

pub use self::csv::*;
pub use schema_gen::*;
pub use sqlite::*;
