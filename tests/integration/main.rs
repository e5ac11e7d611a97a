//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises the engine against mock
//! adapters. Everything runs on simulated time with no radio required.

mod engine_tests;
mod simulated_device_tests;
