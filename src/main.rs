#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    // Set up logging, RUST_LOG controls verbosity
    env_logger::init();

    // Native file dialogs are spawned onto this runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("Failed to start async runtime: {err}");
            std::process::exit(1);
        }
    };
    let _guard = runtime.enter();

    scene_editor::run_app()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
