use anyhow::{Context, Result};
use serde_json::json;

use assetpack_lib::consts::{CONFIG_FILE_NAME, CONTAINER_INPUT_DIR, CONTAINER_OUTPUT_DIR};
use assetpack_lib::{BundleConfig, EnvironmentPreference, StrategyRegistry};

use crate::cmd::TargetArgs;
use crate::output::{OutputFormat, print_heading, print_json, print_stat};

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let mut config = BundleConfig::default();
  config
    .apply_env_overrides()
    .context("Invalid environment override")?;

  let registry = StrategyRegistry::with_defaults(&config.toolchain);
  let pairings: Vec<String> = registry
    .entries()
    .into_iter()
    .map(|(flavor, env)| format!("{}/{}", flavor, env))
    .collect();

  let options = TargetArgs::options_for(&config, &registry)?;
  let auto = options
    .select(EnvironmentPreference::Auto)
    .map(|p| p.environment_kind().to_string())
    .unwrap_or_else(|_| "unavailable".to_string());

  if output.is_json() {
    return print_json(&json!({
      "version": env!("CARGO_PKG_VERSION"),
      "platform": format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS),
      "config_file": CONFIG_FILE_NAME,
      "engine": config.engine,
      "image": config.image,
      "package_manager": config.toolchain.package_manager,
      "auto_environment": auto,
      "pairings": pairings,
    }));
  }

  print_heading(&format!("assetpack v{}", env!("CARGO_PKG_VERSION")));
  print_stat("Platform", &format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS));
  print_stat("Config file", CONFIG_FILE_NAME);
  print_stat("Engine", &config.engine);
  print_stat("Image", &config.image);
  print_stat("Mounts", &format!("{} -> {}", CONTAINER_INPUT_DIR, CONTAINER_OUTPUT_DIR));
  print_stat("Package manager", &config.toolchain.package_manager);
  print_stat("Auto environment", &auto);
  print_stat("Pairings", &pairings.join(", "));

  Ok(())
}
