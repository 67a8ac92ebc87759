// Opal Engine sandbox: opens a window and renders a rotating cube until the
// window is closed or ESC is pressed.

use anyhow::Result;
use opal_engine_core::{Engine, EngineConfig};

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    let config = EngineConfig::load_or_default("opal.json");
    if let Err(error) = Engine::new(config).run() {
        // Teardown already ran inside `run`; nothing is left to release.
        log::error!("Engine terminated with a fatal error: {error}");
        std::process::exit(1);
    }
    Ok(())
}
