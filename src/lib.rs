#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod world_core;
