//! Build script for liblzma-sys.
//!
//! Locates the system liblzma through pkg-config, refuses releases that are
//! known to ship a compromised payload, and generates the bindings with
//! bindgen. Vulnerabilities that only affect optional code paths (such as
//! the multi-threaded decoder) are handled at runtime by the safe wrapper,
//! not here; rejecting those versions outright would make the crate
//! unbuildable on otherwise healthy distributions.

use std::env;
use std::path::PathBuf;

/// Releases whose official artifacts were backdoored (CVE-2024-3094).
/// These are never acceptable, not even with the unsafe override.
const BACKDOORED_RELEASES: &[&str] = &["5.6.0", "5.6.1"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=wrapper.h");
    println!("cargo:rerun-if-env-changed=LIBLZMA_SYS_ALLOW_UNSAFE");

    // 5.4.0 is the first release shipping lzma_stream_decoder_mt.
    let library = pkg_config::Config::new()
        .atleast_version("5.4.0")
        .probe("liblzma")
        .expect("pkg-config could not locate a usable liblzma; install the xz development package");

    check_version(&library.version);

    for path in &library.include_paths {
        println!("cargo:include={}", path.display());
    }

    generate_bindings(&library.include_paths);
}

/// Fail the build when pkg-config resolved one of the backdoored releases.
fn check_version(version: &str) {
    if version.is_empty() {
        println!("cargo:warning=pkg-config returned liblzma without version information");
        return;
    }

    let core = version.split(['-', '+']).next().unwrap_or(version);
    if BACKDOORED_RELEASES.contains(&core) {
        if env::var_os("LIBLZMA_SYS_ALLOW_UNSAFE").is_some() {
            println!(
                "cargo:warning=linking backdoored liblzma {version} (allowed by LIBLZMA_SYS_ALLOW_UNSAFE)"
            );
            return;
        }
        panic!(
            "system liblzma {version} is a backdoored release (CVE-2024-3094); refusing to link"
        );
    }
}

fn generate_bindings(include_paths: &[PathBuf]) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set by Cargo"));

    let mut builder = bindgen::Builder::default()
        .header("wrapper.h")
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .allowlist_function("lzma_.*")
        .allowlist_type("lzma_.*")
        .allowlist_var("LZMA_.*")
        .allowlist_item("LZMA_.*")
        .blocklist_type("max_align_t")
        .size_t_is_usize(true)
        .layout_tests(false);

    for path in include_paths {
        builder = builder.clang_arg(format!("-I{}", path.display()));
    }

    let bindings = builder
        .generate()
        .expect("unable to generate bindings for liblzma");

    bindings
        .write_to_file(out_dir.join("bindings.rs"))
        .expect("couldn't write bindings.rs to OUT_DIR");
}
