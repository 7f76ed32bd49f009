#![allow(unused_imports)]
pub mod constants;
pub mod report;
pub mod tree;
pub mod types;
pub mod usage;
pub mod utils;
pub mod volume;

// re-export commonly used items
pub use types::*;
pub use usage::aggregate;
pub use utils::{format_elapsed, format_size};
