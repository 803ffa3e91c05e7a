pub mod api;
pub mod permissions;
pub mod recognizers;
pub mod storage;
