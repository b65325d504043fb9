//! Build script for the rooftop binary crate.
//!
//! Exposes the image API key to `main.rs` as `ROOFTOP_API_KEY`. The key is
//! read from `GEMINI_API_KEY`, falling back to `API_KEY`, and is empty
//! when neither is set. An empty key is not an error here; requests made
//! with it fail at the API and surface as a generation error.

use std::env;

/// Environment variables checked for the key, in priority order.
const KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

fn main() {
    for var in KEY_VARS {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let key = KEY_VARS
        .iter()
        .find_map(|var| env::var(var).ok().filter(|value| !value.is_empty()))
        .unwrap_or_default();

    if key.is_empty() {
        println!("cargo:warning=no GEMINI_API_KEY or API_KEY set; renders will fail");
    }
    println!("cargo:rustc-env=ROOFTOP_API_KEY={key}");
}
