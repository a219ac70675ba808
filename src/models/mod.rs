//! Domain models for the story bridge.
//!
//! - [`Story`]: a Jira Story projected to id, key, summary, description and
//!   acceptance criteria. Built per request from tracker responses.
//! - [`ApiResult`]: the `{success, data?, error?}` envelope returned to
//!   callers in place of raised errors.

mod result;
mod story;

pub use result::*;
pub use story::*;
