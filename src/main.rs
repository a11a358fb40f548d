#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;

    use geosphere::cli::CliArgs;
    use geosphere::world_core::config::GameConfig;
    use geosphere::world_core::export::WorldExport;
    use geosphere::world_core::terrain::TerrainType;
    use geosphere::world_core::world::WorldGenerator;

    env_logger::init();
    let args = CliArgs::from_env_args()?;

    let mut config = match &args.config_path {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::load(),
    };
    args.apply(&mut config);

    let generator = WorldGenerator::new(config).context("invalid world configuration")?;
    let world = generator.generate().context("world generation failed")?;

    log::info!(
        "world seed {} radius {}: {} countries",
        world.seed(),
        world.radius(),
        world.country_count()
    );
    let histogram = world.terrain_histogram();
    for terrain in TerrainType::ALL {
        log::info!("{terrain:>8}: {} vertices", histogram[terrain.index()]);
    }

    WorldExport::from_world(&world)
        .write(&args.out_path)
        .with_context(|| format!("failed to export world to {}", args.out_path.display()))?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Generation needs a filesystem for config and export; native only.
}
