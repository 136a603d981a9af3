//! The three-phase build lifecycle.
//!
//! A [`Pipeline`] pairs one [`BuildStrategy`] with one [`Environment`] and
//! runs pre-build, build and post-build in that order. Each phase's commands
//! are computed right before the phase executes, so later phases can rely
//! on what earlier ones left on disk. The first failing command ends the
//! run; its error is returned as-is.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::asset::{ConstructContext, ModuleRef, OutputDir};
use crate::command::{CommandSet, Phase};
use crate::environment::{Environment, EnvironmentKind};
use crate::error::{BundleError, ConfigError};
use crate::execute::{CommandRunner, ExecuteError, Invocation};
use crate::flavor::{BuildStrategy, Flavor};

/// Commands of one phase, as reported by [`Pipeline::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhasePlan {
  pub phase: Phase,
  pub commands: CommandSet,
}

/// Commands and invocations of a pipeline for one module.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSpec {
  pub environment: EnvironmentKind,
  pub phases: Vec<PhasePlan>,
  pub invocations: BTreeMap<Phase, Vec<Invocation>>,
}

/// A fixed (strategy, environment) composition.
#[derive(Clone)]
pub struct Pipeline {
  strategy: Arc<dyn BuildStrategy>,
  environment: Arc<dyn Environment>,
}

impl fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("flavor", &self.strategy.flavor())
      .field("environment", &self.environment.kind())
      .finish()
  }
}

impl Pipeline {
  pub fn new(strategy: Arc<dyn BuildStrategy>, environment: Arc<dyn Environment>) -> Self {
    Self { strategy, environment }
  }

  pub fn flavor(&self) -> Flavor {
    self.strategy.flavor()
  }

  pub fn environment_kind(&self) -> EnvironmentKind {
    self.environment.kind()
  }

  pub fn environment(&self) -> &dyn Environment {
    self.environment.as_ref()
  }

  /// Commands of `phase` for a module and output directory.
  pub fn phase_commands(&self, phase: Phase, module: &ModuleRef, output: &OutputDir) -> CommandSet {
    let layout = self.environment.layout(module, output);
    self.strategy.commands(phase, &layout)
  }

  /// Commands of every phase, without running anything.
  pub fn plan(&self, module: &ModuleRef, output: &OutputDir) -> Vec<PhasePlan> {
    Phase::ALL
      .into_iter()
      .map(|phase| PhasePlan {
        phase,
        commands: self.phase_commands(phase, module, output),
      })
      .collect()
  }

  /// Everything a run would execute, without side effects.
  pub fn describe(&self, module: &ModuleRef, output: &OutputDir, context: Option<&ConstructContext>) -> PipelineSpec {
    let phases = self.plan(module, output);
    let invocations = phases
      .iter()
      .map(|p| (p.phase, self.environment.invocations(&p.commands, module, output, context)))
      .collect();
    PipelineSpec {
      environment: self.environment_kind(),
      phases,
      invocations,
    }
  }

  /// Run the lifecycle for `module` into `output`.
  ///
  /// An output directory inside the module is rejected before anything
  /// runs. Phases with no commands are skipped. A failing command aborts
  /// the run with the runner's error unchanged; the output directory is
  /// then in an unspecified state.
  pub async fn run<R: CommandRunner>(
    &self,
    runner: &R,
    module: &ModuleRef,
    output: &OutputDir,
    context: Option<&ConstructContext>,
  ) -> Result<(), BundleError> {
    info!(
      module = %module.name(),
      flavor = %self.flavor(),
      environment = %self.environment_kind(),
      output = %output.path().display(),
      "bundling module"
    );

    check_output_location(module, output)?;

    for dir in self.environment.host_dirs(output) {
      debug!(path = %dir.display(), "creating host directory");
      tokio::fs::create_dir_all(&dir).await.map_err(ExecuteError::Io)?;
    }

    for phase in Phase::ALL {
      let commands = self.phase_commands(phase, module, output);
      if commands.is_empty() {
        debug!(phase = %phase, "phase has no commands, skipping");
        continue;
      }

      info!(phase = %phase, commands = commands.len(), "running phase");

      for invocation in self.environment.invocations(&commands, module, output, context) {
        if let Err(e) = runner.run(&invocation).await {
          error!(phase = %phase, module = %module.name(), error = %e, "phase failed");
          return Err(e.into());
        }
      }
    }

    info!(module = %module.name(), "bundle complete");
    Ok(())
  }
}

/// The post-build copies read from the module, so an output directory
/// inside it would be copied into itself.
fn check_output_location(module: &ModuleRef, output: &OutputDir) -> Result<(), ConfigError> {
  if output.path().starts_with(module.path()) {
    return Err(ConfigError::Invalid {
      key: "output".to_string(),
      message: format!(
        "{} is inside the module directory {}",
        output.path().display(),
        module.path().display()
      ),
    });
  }
  Ok(())
}
