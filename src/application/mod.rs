mod app;
pub mod cli;
pub mod quick_add;
mod router;
pub mod screens;
pub mod toast;

pub use app::*;
pub use router::*;
