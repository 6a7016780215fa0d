//! Durable task list persistence over key-value storage.
//!
//! # Responsibility
//! - Own the serialized task list under one well-known storage key.
//! - Provide read-all and append/replace writes with newest-first ordering.
//!
//! # Invariants
//! - Public `read_all`/`write` never return an error; failures become `[]`.
//! - The persisted list never contains two tasks with the same id.

pub mod task_store;
