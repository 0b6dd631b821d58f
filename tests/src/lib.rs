//! # vpurse Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks for the end-of-block pipeline
//! └── src/integration/  # Full pipeline runs against a controller task
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vpurse-tests
//! cargo bench -p vpurse-tests
//! ```

pub mod integration;
