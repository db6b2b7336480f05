//! DataStore test suite
//!
//! One submodule per namespace, plus cross-thread behavior.

mod concurrency_tests;
mod hash_tests;
mod list_tests;
mod set_tests;
mod string_tests;
mod zset_tests;
