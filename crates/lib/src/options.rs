//! Asset options: the composition root.
//!
//! [`AssetOptions`] builds, for one flavor, the containerized and the local
//! pipeline up front. The caller then picks one of them for an actual run,
//! either explicitly or through [`EnvironmentPreference::Auto`].

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::asset::{ConstructContext, ModuleRef, OutputDir};
use crate::config::{BundleConfig, EnvironmentPreference};
use crate::environment::{ContainerEnvironment, EnvironmentKind, LocalEnvironment};
use crate::error::BundleError;
use crate::flavor::{Flavor, Toolchain};
use crate::pipeline::{Pipeline, PipelineSpec};
use crate::registry::StrategyRegistry;

#[derive(Debug, Clone)]
pub struct AssetOptions {
  flavor: Flavor,
  container: Pipeline,
  local: Pipeline,
  package_manager: String,
  engine: String,
}

impl AssetOptions {
  /// Build both compositions for `flavor`.
  ///
  /// `toolchain` names the package manager probed by automatic selection
  /// and should be the one `registry` was built with. Fails with
  /// [`BundleError::ConfigurationMissing`] if either pairing is not
  /// registered, before anything is run.
  pub fn initialize(
    flavor: Flavor,
    registry: &StrategyRegistry,
    toolchain: &Toolchain,
    container: ContainerEnvironment,
    local: LocalEnvironment,
  ) -> Result<Self, BundleError> {
    let container_strategy = registry.get(flavor, EnvironmentKind::Container)?;
    let local_strategy = registry.get(flavor, EnvironmentKind::Local)?;
    let engine = container.engine().to_string();

    Ok(Self {
      flavor,
      container: Pipeline::new(container_strategy, Arc::new(container)),
      local: Pipeline::new(local_strategy, Arc::new(local)),
      package_manager: toolchain.package_manager.clone(),
      engine,
    })
  }

  /// Build both compositions from a resolved configuration.
  pub fn from_config(config: &BundleConfig, registry: &StrategyRegistry) -> Result<Self, BundleError> {
    Self::initialize(
      config.flavor,
      registry,
      &config.toolchain,
      config.container_environment(),
      config.local_environment(),
    )
  }

  pub fn flavor(&self) -> Flavor {
    self.flavor
  }

  pub fn pipeline(&self, kind: EnvironmentKind) -> &Pipeline {
    match kind {
      EnvironmentKind::Container => &self.container,
      EnvironmentKind::Local => &self.local,
    }
  }

  /// Resolve `preference` to a pipeline using `PATH` lookups.
  pub fn select(&self, preference: EnvironmentPreference) -> Result<&Pipeline, BundleError> {
    self.select_with(preference, |program| which::which(program).is_ok())
  }

  /// Resolve `preference` to a pipeline, asking `is_available` whether a program can be run.
  ///
  /// Explicit preferences are returned without checking. `Auto` prefers a
  /// local build when the package manager is available, then a container
  /// build when the engine is available.
  pub fn select_with(
    &self,
    preference: EnvironmentPreference,
    is_available: impl Fn(&str) -> bool,
  ) -> Result<&Pipeline, BundleError> {
    let kind = match preference {
      EnvironmentPreference::Container => EnvironmentKind::Container,
      EnvironmentPreference::Local => EnvironmentKind::Local,
      EnvironmentPreference::Auto => {
        if is_available(&self.package_manager) {
          EnvironmentKind::Local
        } else if is_available(&self.engine) {
          EnvironmentKind::Container
        } else {
          return Err(BundleError::EnvironmentUnavailable {
            package_manager: self.package_manager.clone(),
            engine: self.engine.clone(),
          });
        }
      }
    };
    debug!(preference = %preference, environment = %kind, "selected build environment");
    Ok(self.pipeline(kind))
  }

  /// Describe both compositions for a module, for consumption by a provisioning tool.
  pub fn bundling_spec(
    &self,
    module: &ModuleRef,
    output: &OutputDir,
    context: Option<&ConstructContext>,
  ) -> BundlingSpec {
    BundlingSpec {
      flavor: self.flavor,
      module: module.name().to_string(),
      container: self.container.describe(module, output, context),
      local: self.local.describe(module, output, context),
    }
  }
}

/// Serializable description of both compositions.
#[derive(Debug, Clone, Serialize)]
pub struct BundlingSpec {
  pub flavor: Flavor,
  pub module: String,
  pub container: PipelineSpec,
  pub local: PipelineSpec,
}
