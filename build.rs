use std::fs;

fn main() {
    // The VERSION file is the single source of truth for release tooling;
    // refuse to build if Cargo.toml drifts from it.
    let version_file =
        fs::read_to_string("VERSION").expect("VERSION file not found - run: echo '0.3.0' > VERSION");
    let version = version_file.trim();

    let cargo_version = env!("CARGO_PKG_VERSION");

    if version != cargo_version {
        panic!(
            "version mismatch: VERSION file says {} but Cargo.toml says {} - update both together",
            version, cargo_version
        );
    }

    println!("cargo:rerun-if-changed=VERSION");
}
