pub mod canonical;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod schema;
pub mod split;
pub mod transform;
pub mod ui;
pub mod validate;
pub mod writer;

pub use cli::{Cli, Commands};
pub use error::{DataError, DataResult, SplitError};
pub use split::{split_record, Overflow, SplitPlan, SplitSpec};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};
