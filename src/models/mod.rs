mod action;
mod process;
mod query;

pub use action::*;
pub use process::*;
pub use query::*;
