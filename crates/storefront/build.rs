//! Build script for the storefront crate.
//!
//! Fingerprints `static/css/main.css` so the layout can link a
//! content-addressed stylesheet (`main.<hash>.css`) that browsers may cache
//! forever.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Number of hex characters of the digest used in the file name.
const FINGERPRINT_LEN: usize = 8;

fn main() {
    fingerprint_stylesheet();
}

/// Emit `CSS_HASH` for `env!("CSS_HASH")` and write the fingerprinted copy
/// to `static/css/derived/`.
fn fingerprint_stylesheet() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_css = Path::new(&manifest_dir).join("static/css");
    let source = static_css.join("main.css");

    println!("cargo:rerun-if-changed={}", source.display());

    let Ok(content) = fs::read(&source) else {
        println!("cargo:warning=stylesheet not found at {}", source.display());
        println!("cargo:rustc-env=CSS_HASH=");
        return;
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let fingerprint = digest.get(..FINGERPRINT_LEN).unwrap_or(&digest);
    println!("cargo:rustc-env=CSS_HASH={fingerprint}");

    let derived = static_css.join("derived");
    fs::create_dir_all(&derived).expect("failed to create derived CSS directory");
    fs::write(derived.join(format!("main.{fingerprint}.css")), &content)
        .expect("failed to write fingerprinted stylesheet");
}
