use std::env;

/// `cargo xtask bundle iir_filters --release [--target <triple>]`
fn main() -> nih_plug_xtask::Result<()> {
    let args: Vec<String> = env::args().collect();

    // Separate build directory per target triple when cross-compiling bundles
    let target = args
        .iter()
        .position(|a| a == "--target")
        .and_then(|pos| args.get(pos + 1));
    if let Some(target) = target {
        env::set_var("CARGO_TARGET_DIR", format!("target/{target}"));
    }

    nih_plug_xtask::main()
}
