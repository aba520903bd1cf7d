//! Build script - hands the esp-hal linker script to the firmware link.
//!
//! Host builds (tests, `cargo test --lib`) skip this entirely.

use std::env;

fn main() {
    // Cargo exposes enabled features to build scripts as env vars.
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        // linkall.x is shipped by esp-hal and pulls in the memory layout
        // and the esp-wifi ROM symbols.
        println!("cargo:rustc-link-arg-bins=-Tlinkall.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
