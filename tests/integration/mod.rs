//! Integration test suite for badgesync
//!
//! End-to-end tests of the resolver, the cache gatekeeper, the build hook and
//! the `badgesync` binary. No test touches the real badge API: library tests
//! script responses with `FakeFetcher`, binary tests point the API base at a
//! closed local port.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cache_behavior**: Hash gating, invalidation and write ordering on disk
//! - **resolution**: Tier fallbacks through the full batch pipeline
//! - **build_hook**: `virtual:badges` serving and recovery
//! - **cli**: The `badgesync` binary

mod build_hook;
mod cache_behavior;
mod cli;
mod common;
mod resolution;
