//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `huskeliste_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // Flutter/FFI runtime setup. The app itself has no CLI surface.
    println!("huskeliste_core ping={}", huskeliste_core::ping());
    println!("huskeliste_core version={}", huskeliste_core::core_version());
}
