//! Concrete [`gossamer_api::Storage`] backends: single-threaded
//! [`native::NativeStorage`] (C5), thread-safe [`concurrent::ConcurrentStorage`]
//! (C6), and the base/present overlay [`delta::DeltaStorage`] (C7).

pub mod concurrent;
pub mod delta;
pub mod inner;
pub mod native;

pub use concurrent::ConcurrentStorage;
pub use delta::{DeltaStorage, TOMBSTONE_SENTINEL};
pub use native::NativeStorage;
