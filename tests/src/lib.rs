//! # Keygate Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Service → retry → bridge → scripted loader
//! └── benches/           # Builder, script parsing, search
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p kg-tests
//! cargo bench -p kg-tests
//! ```

pub mod integration;
