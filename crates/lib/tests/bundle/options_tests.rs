//! Facade-level tests: configuration to finished artifact.

use assetpack_lib::{
  AssetOptions, BundleConfig, BundleError, EnvironmentKind, EnvironmentPreference, ExecuteError, Flavor,
  ProcessRunner, RecordingRunner, StrategyRegistry,
};

use super::common::{TestEnv, list_files};

fn typed_config(env: &TestEnv) -> BundleConfig {
  BundleConfig {
    flavor: Flavor::TypedScript,
    environment: EnvironmentPreference::Local,
    toolchain: env.toolchain(),
    ..BundleConfig::default()
  }
}

#[tokio::test]
async fn configured_local_bundle() {
  let env = TestEnv::new();
  let module = env.typed_module();
  let output = env.output();
  let config = typed_config(&env);

  let registry = StrategyRegistry::with_defaults(&config.toolchain);
  let options = AssetOptions::from_config(&config, &registry).unwrap();
  let pipeline = options.select(config.environment).unwrap();

  pipeline.run(&ProcessRunner, &module, &output, None).await.unwrap();

  assert!(list_files(output.path()).contains(&"index.js".to_string()));
}

#[tokio::test]
async fn auto_selects_local_when_package_manager_exists() {
  let env = TestEnv::new();
  let config = BundleConfig {
    environment: EnvironmentPreference::Auto,
    ..typed_config(&env)
  };

  let registry = StrategyRegistry::with_defaults(&config.toolchain);
  let options = AssetOptions::from_config(&config, &registry).unwrap();

  // The fake npm is an absolute path to an executable file
  let pipeline = options.select(EnvironmentPreference::Auto).unwrap();
  assert_eq!(pipeline.environment_kind(), EnvironmentKind::Local);
}

#[tokio::test]
async fn container_dry_run_mounts_module_and_output() {
  let env = TestEnv::new();
  let module = env.typed_module();
  let output = env.output();
  let config = typed_config(&env);

  let registry = StrategyRegistry::with_defaults(&config.toolchain);
  let options = AssetOptions::from_config(&config, &registry).unwrap();
  let runner = RecordingRunner::new();

  options
    .pipeline(EnvironmentKind::Container)
    .run(&runner, &module, &output, None)
    .await
    .unwrap();

  let invocations = runner.invocations().await;
  assert_eq!(invocations.len(), 2);
  let args = invocations[0].args.join(" ");
  assert!(args.contains(&format!("{}:/asset-input:delegated", module.path().display())));
  assert!(args.contains(&format!("{}:/asset-output:delegated", output.path().display())));
  // Host output directory exists so the engine does not create it as root
  assert!(output.path().is_dir());
}

#[tokio::test]
async fn container_install_failure_skips_post_build() {
  for flavor in Flavor::ALL {
    let env = TestEnv::new();
    let module = env.module();
    let output = env.output();
    let config = BundleConfig {
      flavor,
      ..typed_config(&env)
    };

    let registry = StrategyRegistry::with_defaults(&config.toolchain);
    let options = AssetOptions::from_config(&config, &registry).unwrap();
    let runner = RecordingRunner::failing_on("install", 254);

    let err = options
      .pipeline(EnvironmentKind::Container)
      .run(&runner, &module, &output, None)
      .await
      .unwrap_err();

    assert!(
      matches!(err, BundleError::Execute(ExecuteError::CmdFailed { code: Some(254), .. })),
      "{} container: unexpected error {:?}",
      flavor,
      err
    );
    // Container pre-build is empty, so the build container is the first and only call
    let scripts = runner.scripts().await;
    assert_eq!(scripts.len(), 1, "{} container ran {:?}", flavor, scripts);
    assert!(scripts[0].contains("install"));
    assert!(scripts.iter().all(|s| !s.contains("cp ")));
  }
}

#[test]
fn unregistered_flavor_is_reported_before_running() {
  let config = BundleConfig::default();
  let result = AssetOptions::from_config(&config, &StrategyRegistry::new());
  assert!(matches!(result, Err(BundleError::ConfigurationMissing { .. })));
}
