//! Build script for crashbridge-core
//!
//! The root scanner keeps its path tables as C-string literals (`c"..."`) so
//! that a scan performs no allocation. Those literals need Rust 1.77.0 or newer,
//! so we check the toolchain up front and fail with a readable message instead
//! of a parse error deep inside the crate.

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    match rustc_version::version() {
        Ok(rustc_version) => {
            let min_rust_version = rustc_version::Version::new(1, 77, 0);

            if rustc_version < min_rust_version {
                panic!(
                    "crashbridge-core requires Rust {} or newer (C-string literals), found {}",
                    min_rust_version, rustc_version
                );
            }
        }
        // If we can't get version (e.g., in some build environments), just warn
        Err(_) => println!("cargo:warning=could not verify Rust version"),
    }
}
