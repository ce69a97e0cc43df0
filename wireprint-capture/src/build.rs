use std::path::PathBuf;
use std::process::Command;

/// Cross-compiles the BPF kernel program (`wireprint-capture-xdp`) for the
/// `bpfel-unknown-none` target using `cargo +nightly`.
///
/// The resulting ELF binary is embedded into the userspace binary via
/// `aya::include_bytes_aligned!` in `probe.rs`.
///
/// Requirements: nightly toolchain with `rust-src`; `wireprint-capture-xdp/`
/// pins its channel via its own `rust-toolchain.toml`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let programs_dir = manifest_dir
        .parent()
        .ok_or("could not find workspace root")?
        .join("wireprint-capture-xdp");

    println!("cargo:rerun-if-changed={}", programs_dir.join("src/main.rs").display());
    println!("cargo:rerun-if-changed={}", programs_dir.join("Cargo.toml").display());

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let bpf_target_dir = out_dir.join("bpf-programs-target");

    // Cargo sets RUSTC/RUSTDOC/RUSTUP_TOOLCHAIN for the current (stable)
    // toolchain while running a build script; the child process would
    // inherit those and override the nightly selection we need. Remove them
    // so rustup picks the toolchain from wireprint-capture-xdp's
    // rust-toolchain.toml.
    let status = Command::new("cargo")
        .args(["build", "--release", "--package", "wireprint-capture-xdp"])
        .env("CARGO_TARGET_DIR", &bpf_target_dir)
        .env_remove("RUSTC")
        .env_remove("RUSTDOC")
        .env_remove("RUSTUP_TOOLCHAIN")
        .env_remove("RUSTC_WORKSPACE_WRAPPER")
        .env_remove("RUSTC_WRAPPER")
        .current_dir(&programs_dir)
        .status();

    match status {
        Ok(s) if s.success() => {}
        Ok(s) => {
            return Err(format!(
                "cargo build of wireprint-capture-xdp failed (exit {:?}).\n\
                Ensure nightly toolchain and rust-src are installed:\n\
                  rustup toolchain install nightly\n\
                  rustup component add rust-src --toolchain nightly",
                s.code()
            )
            .into());
        }
        Err(e) => {
            return Err(format!("failed to run cargo: {e}").into());
        }
    }

    let bpf_bin = bpf_target_dir.join("bpfel-unknown-none/release/wireprint-capture-xdp");

    if !bpf_bin.exists() {
        return Err(format!("BPF binary not found at {}", bpf_bin.display()).into());
    }

    let out_file = out_dir.join("xdp.bpf.o");
    std::fs::copy(&bpf_bin, &out_file)?;

    println!("cargo:rustc-env=XDP_BPF_OBJ={}", out_file.display());
    Ok(())
}
