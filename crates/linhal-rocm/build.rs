use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=ROCM_PATH");

    let want_rocblas = env::var_os("CARGO_FEATURE_ROCBLAS").is_some();
    let want_rocfft = env::var_os("CARGO_FEATURE_ROCFFT").is_some();
    if !want_rocblas && !want_rocfft {
        // Pure-Rust build: no link lines.
        return;
    }

    let root = env::var("ROCM_PATH").unwrap_or_else(|_| "/opt/rocm".to_string());
    let lib = PathBuf::from(&root).join("lib");
    if !lib.exists() {
        println!("cargo:warning=ROCm libraries not found under {}", lib.display());
    }
    println!("cargo:rustc-link-search=native={}", lib.display());
    println!("cargo:rustc-link-lib=dylib=amdhip64");

    if want_rocblas {
        println!("cargo:rustc-link-lib=dylib=rocblas");
    }
    if want_rocfft {
        println!("cargo:rustc-link-lib=dylib=rocfft");
    }
}
