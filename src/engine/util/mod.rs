mod cache;
mod counted_ref;

pub use cache::RefCache;
pub use counted_ref::{CountedRef, RefCountError};
