pub mod event;
pub mod sse;
