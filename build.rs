use std::path::Path;

fn main() -> std::io::Result<()> {
    // Only needed when the gui feature is enabled.
    if std::env::var("CARGO_FEATURE_GUI").is_err() {
        return Ok(());
    }

    // rust-embed needs the vista-ui dist directory to exist even before
    // `cargo xtask build-ui` has been run. A placeholder page is written
    // when the real build output is absent.
    let dist = Path::new("crates/vista-ui/dist");
    std::fs::create_dir_all(dist)?;

    let index = dist.join("index.html");
    if !index.exists() {
        std::fs::write(
            &index,
            "<!DOCTYPE html><html><body>vista-ui not built: run \
             `cargo run -p vista-xtask -- build-ui`</body></html>",
        )?;
    }

    println!("cargo:rerun-if-changed=crates/vista-ui/dist");
    Ok(())
}
