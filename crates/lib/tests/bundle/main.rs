//! End-to-end bundle tests on the local host.
//!
//! These run the real pipeline through `/bin/sh` against a fake package
//! manager, so no Node.js installation is needed.

#![cfg(unix)]

mod common;
mod local_tests;
mod options_tests;
