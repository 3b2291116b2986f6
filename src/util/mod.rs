// util/mod.rs
pub mod callbacks;

pub use callbacks::CallbackList;
