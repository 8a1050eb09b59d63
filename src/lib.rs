pub mod cli;
pub mod config;
pub mod daylog;
pub mod error;
pub mod log;
pub mod store;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, Settings};
pub use daylog::{Daylog, Task};
pub use error::{DaylogError, DaylogResult};
pub use store::{DaylogRef, DaylogStore, StoreContext};
