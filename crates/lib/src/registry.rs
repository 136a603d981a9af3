//! Registry of build strategies keyed by (flavor, environment).

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::environment::EnvironmentKind;
use crate::error::BundleError;
use crate::flavor::{
  BuildStrategy, Flavor, PlainScriptContainer, PlainScriptLocal, Toolchain, TypedScriptContainer, TypedScriptLocal,
};

#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
  strategies: BTreeMap<(Flavor, EnvironmentKind), Arc<dyn BuildStrategy>>,
}

impl StrategyRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding the four built-in pairings.
  pub fn with_defaults(toolchain: &Toolchain) -> Self {
    let mut registry = Self::new();
    registry.register(
      EnvironmentKind::Container,
      Arc::new(PlainScriptContainer::new(toolchain.clone())),
    );
    registry.register(EnvironmentKind::Local, Arc::new(PlainScriptLocal::new(toolchain.clone())));
    registry.register(
      EnvironmentKind::Container,
      Arc::new(TypedScriptContainer::new(toolchain.clone())),
    );
    registry.register(EnvironmentKind::Local, Arc::new(TypedScriptLocal::new(toolchain.clone())));
    registry
  }

  /// Register `strategy` for its flavor in `environment`, replacing any previous one.
  pub fn register(&mut self, environment: EnvironmentKind, strategy: Arc<dyn BuildStrategy>) {
    self.strategies.insert((strategy.flavor(), environment), strategy);
  }

  pub fn get(&self, flavor: Flavor, environment: EnvironmentKind) -> Result<Arc<dyn BuildStrategy>, BundleError> {
    self
      .strategies
      .get(&(flavor, environment))
      .cloned()
      .ok_or(BundleError::ConfigurationMissing { flavor, environment })
  }

  /// Registered pairings, ordered by flavor then environment.
  pub fn entries(&self) -> Vec<(Flavor, EnvironmentKind)> {
    self.strategies.keys().copied().collect()
  }
}
