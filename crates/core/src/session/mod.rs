//! Session gate: login, token storage and the identity shown by the composer.

pub mod gate;
pub mod identity;
pub mod storage;

pub use gate::SessionGate;
pub use identity::Identity;
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
