use std::env;
use std::path::PathBuf;

const HEADER: &str = "concourse.h";

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let header = PathBuf::from(&crate_dir).join(HEADER);

    let mut config = cbindgen::Config::default();
    config.language = cbindgen::Language::C;
    config.include_guard = Some("CONCOURSE_H".to_string());
    config.autogen_warning = Some(
        "/* Generated by concourse-ffi/build.rs from src/lib.rs. Do not edit. */".to_string(),
    );
    config.cpp_compat = true;
    config.documentation = true;

    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            bindings.write_to_file(header);
        }
        // Keep the library buildable when the header can't be regenerated
        // (e.g. a syntax error cbindgen trips over before rustc does).
        Err(e) => println!("cargo:warning=concourse.h not regenerated: {}", e),
    }
}
