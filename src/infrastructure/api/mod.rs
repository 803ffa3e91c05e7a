mod endpoints;
mod pipeline;

pub use endpoints::*;
pub use pipeline::*;
