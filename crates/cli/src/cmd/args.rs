//! Arguments shared by `bundle` and `plan`, and the config layering they drive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use assetpack_lib::config::parse_var;
use assetpack_lib::{AssetOptions, BundleConfig, EnvironmentPreference, Flavor, ModuleRef, OutputDir, StrategyRegistry};

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
  /// Module directory containing the function code
  pub module: PathBuf,

  /// Directory the artifact is written to
  #[arg(short, long, default_value = "asset.out")]
  pub out: PathBuf,

  /// Build flavor (plain-script or typed-script)
  #[arg(long)]
  pub flavor: Option<Flavor>,

  /// Build environment (auto, container or local)
  #[arg(long = "env", value_name = "ENV")]
  pub environment: Option<EnvironmentPreference>,

  /// Config file (default: <MODULE>/assetpack.json if present)
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// Container image for containerized builds
  #[arg(long)]
  pub image: Option<String>,

  /// Variable exported to every build command
  #[arg(long = "var", value_name = "KEY=VALUE")]
  pub vars: Vec<String>,
}

impl TargetArgs {
  /// Defaults, then the config file, then `ASSETPACK_*` variables, then flags.
  pub fn resolve_config(&self) -> Result<BundleConfig> {
    let mut config = match &self.config {
      Some(path) => {
        BundleConfig::load(path).with_context(|| format!("Failed to load config: {}", path.display()))?
      }
      None => BundleConfig::discover(&self.module)
        .with_context(|| format!("Failed to load config from {}", self.module.display()))?,
    };

    config
      .apply_env_overrides()
      .context("Invalid environment override")?;

    if let Some(flavor) = self.flavor {
      config.flavor = flavor;
    }
    if let Some(environment) = self.environment {
      config.environment = environment;
    }
    if let Some(image) = &self.image {
      config.image = image.clone();
    }
    for raw in &self.vars {
      let (key, value) = parse_var(raw).context("Invalid --var")?;
      config.vars.insert(key, value);
    }

    debug!(flavor = %config.flavor, environment = %config.environment, image = %config.image, "resolved configuration");
    Ok(config)
  }

  pub fn options(&self, config: &BundleConfig) -> Result<AssetOptions> {
    let registry = StrategyRegistry::with_defaults(&config.toolchain);
    Self::options_for(config, &registry)
  }

  pub fn options_for(config: &BundleConfig, registry: &StrategyRegistry) -> Result<AssetOptions> {
    AssetOptions::from_config(config, registry).context("Failed to initialize asset options")
  }

  pub fn module(&self) -> ModuleRef {
    ModuleRef::new(&self.module)
  }

  pub fn output(&self) -> OutputDir {
    OutputDir::new(&self.out)
  }
}
