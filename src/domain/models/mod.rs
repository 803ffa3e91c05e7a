mod cache;
mod event;
mod navigation;
mod notification;
mod permissions;
mod recognizer;
mod request;
mod session;
mod storage;
mod submission;
mod transaction;
mod voice;

pub use cache::*;
pub use event::*;
pub use navigation::*;
pub use notification::*;
pub use permissions::*;
pub use recognizer::*;
pub use request::*;
pub use session::*;
pub use storage::*;
pub use submission::*;
pub use transaction::*;
pub use voice::*;
