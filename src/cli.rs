use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::world_core::config::GameConfig;

#[derive(Clone, Debug)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub seed: Option<u32>,
    pub subdivisions: Option<u32>,
    pub out_path: PathBuf,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            seed: None,
            subdivisions: None,
            out_path: PathBuf::from("world.json"),
        }
    }
}

impl CliArgs {
    pub fn from_env_args() -> Result<Self> {
        Self::from_iter(
            std::env::args_os().skip(1),
            std::env::var_os("GEOSPHERE_SEED"),
        )
    }

    fn from_iter<I>(args: I, env_seed: Option<OsString>) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut cli = Self::default();

        if let Some(seed) = env_seed {
            cli.seed = Some(parse_number("GEOSPHERE_SEED", &seed)?);
        }

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg_str = arg.to_string_lossy();
            match arg_str.as_ref() {
                "--config" => {
                    cli.config_path = Some(PathBuf::from(value_for(&mut iter, "--config")?));
                }
                "--out" => cli.out_path = PathBuf::from(value_for(&mut iter, "--out")?),
                "--seed" => {
                    let value = value_for(&mut iter, "--seed")?;
                    cli.seed = Some(parse_number("--seed", &value)?);
                }
                "--subdivisions" => {
                    let value = value_for(&mut iter, "--subdivisions")?;
                    cli.subdivisions = Some(parse_number("--subdivisions", &value)?);
                }
                other => log::warn!("ignoring unknown argument {other}"),
            }
        }

        Ok(cli)
    }

    /// Command-line values win over the config file.
    pub fn apply(&self, config: &mut GameConfig) {
        if let Some(seed) = self.seed {
            config.world.seed = seed;
        }
        if let Some(subdivisions) = self.subdivisions {
            config.world.subdivisions = subdivisions;
        }
    }
}

fn value_for<I>(iter: &mut I, flag: &str) -> Result<OsString>
where
    I: Iterator<Item = OsString>,
{
    iter.next().ok_or_else(|| anyhow!("{flag} requires a value"))
}

fn parse_number(name: &str, value: &std::ffi::OsStr) -> Result<u32> {
    value
        .to_string_lossy()
        .trim()
        .parse()
        .with_context(|| format!("{name} expects a non-negative integer"))
}
