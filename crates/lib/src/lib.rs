//! assetpack-lib: packaging pipeline for deployable function code.
//!
//! This crate turns a module's source tree into an artifact directory:
//! - `Pipeline`: runs pre-build, build and post-build for one module
//! - `BuildStrategy`: phase commands of one (flavor, environment) pairing
//! - `Environment`: where commands run (container or local host)
//! - `AssetOptions`: builds and selects the pipelines for a flavor

pub mod asset;
pub mod command;
pub mod config;
pub mod consts;
pub mod digest;
pub mod environment;
pub mod error;
pub mod execute;
pub mod flavor;
pub mod options;
pub mod pipeline;
pub mod registry;

pub use asset::{ConstructContext, ModuleRef, OutputDir};
pub use command::{CommandSet, Phase};
pub use config::{BundleConfig, EnvironmentPreference};
pub use environment::{ContainerEnvironment, Environment, EnvironmentKind, LocalEnvironment};
pub use error::{BundleError, ConfigError};
pub use execute::{CommandRunner, ExecuteError, Invocation, ProcessRunner, RecordingRunner};
pub use flavor::{BuildStrategy, Flavor, Toolchain};
pub use options::{AssetOptions, BundlingSpec};
pub use pipeline::{PhasePlan, Pipeline, PipelineSpec};
pub use registry::StrategyRegistry;
