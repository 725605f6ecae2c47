use std::path::Path;
use std::{env, fs};

fn generate_file(filename: &str, contents: &str) {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join(filename);
    fs::write(dest_path, contents).unwrap();
}

// Records the build profile next to the version information collected by
// shadow-rs so that the startup banner can tell debug and release binaries
// apart.
fn generate_build_info() {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    generate_file("profile", &profile);
}

fn main() -> shadow_rs::SdResult<()> {
    generate_build_info();
    shadow_rs::new()
}
