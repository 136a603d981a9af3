//! Local-environment bundle tests.

use std::sync::Arc;

use assetpack_lib::digest::digest_directory;
use assetpack_lib::flavor::{PlainScriptLocal, TypedScriptLocal};
use assetpack_lib::{
  BundleError, ConfigError, ConstructContext, ExecuteError, LocalEnvironment, OutputDir, Pipeline, ProcessRunner,
};

use super::common::{TestEnv, list_files};

fn typed_local(env: &TestEnv) -> Pipeline {
  Pipeline::new(
    Arc::new(TypedScriptLocal::new(env.toolchain())),
    Arc::new(LocalEnvironment::new()),
  )
}

fn plain_local(env: &TestEnv) -> Pipeline {
  Pipeline::new(
    Arc::new(PlainScriptLocal::new(env.toolchain())),
    Arc::new(LocalEnvironment::new()),
  )
}

#[tokio::test]
async fn typed_bundle_contains_production_deps_and_compiled_output() {
  let env = TestEnv::new();
  let module = env.typed_module();
  let output = env.output();

  typed_local(&env).run(&ProcessRunner, &module, &output, None).await.unwrap();

  assert_eq!(
    list_files(output.path()),
    vec!["index.js", "lib/util.js", "node_modules/left-pad/index.js"]
  );
}

#[tokio::test]
async fn typed_bundle_runs_package_manager_in_order() {
  let env = TestEnv::new();
  let module = env.typed_module();

  typed_local(&env).run(&ProcessRunner, &module, &env.output(), None).await.unwrap();

  let calls = std::fs::read_to_string(module.path().join(".npm-calls")).unwrap();
  assert_eq!(calls.lines().collect::<Vec<_>>(), vec!["install", "run build", "ci --omit=dev"]);
}

#[tokio::test]
async fn rerunning_into_same_output_is_idempotent() {
  let env = TestEnv::new();
  let module = env.typed_module();
  let output = env.output();
  let pipeline = typed_local(&env);

  pipeline.run(&ProcessRunner, &module, &output, None).await.unwrap();
  let first = digest_directory(output.path(), &[]).unwrap();

  // Leftovers from an earlier compile must not leak into the next artifact
  env.write_module_file("dist/stale.js", "old build");

  pipeline.run(&ProcessRunner, &module, &output, None).await.unwrap();
  let second = digest_directory(output.path(), &[]).unwrap();

  assert_eq!(first, second);
  assert!(!output.path().join("stale.js").exists());
}

#[tokio::test]
async fn empty_module_fails_at_install_without_copying() {
  let env = TestEnv::new();
  let module = env.module();
  let output = env.output();

  let err = typed_local(&env)
    .run(&ProcessRunner, &module, &output, None)
    .await
    .unwrap_err();

  match err {
    BundleError::Execute(ExecuteError::CmdFailed { cmd, code, stderr }) => {
      assert!(cmd.ends_with("npm install"), "unexpected command {}", cmd);
      assert_eq!(code, Some(254));
      assert!(stderr.contains("package.json"));
    }
    other => panic!("expected CmdFailed, got {:?}", other),
  }
  assert!(!output.path().exists());
}

#[tokio::test]
async fn plain_empty_module_fails_at_install_without_copying() {
  let env = TestEnv::new();
  let module = env.module();
  let output = env.output();

  let err = plain_local(&env)
    .run(&ProcessRunner, &module, &output, None)
    .await
    .unwrap_err();

  match err {
    BundleError::Execute(ExecuteError::CmdFailed { cmd, code, stderr }) => {
      assert!(cmd.ends_with("npm install --omit=dev"), "unexpected command {}", cmd);
      assert_eq!(code, Some(254));
      assert!(stderr.contains("package.json"));
    }
    other => panic!("expected CmdFailed, got {:?}", other),
  }
  assert!(!output.path().exists());
}

#[tokio::test]
async fn plain_bundle_into_module_subdirectory_is_rejected() {
  let env = TestEnv::new();
  let module = env.plain_module();
  let output = OutputDir::new(module.path().join("asset.out"));
  let pipeline = plain_local(&env);

  // A second attempt must fail the same way, not on leftovers of the first
  for _ in 0..2 {
    let err = pipeline
      .run(&ProcessRunner, &module, &output, None)
      .await
      .unwrap_err();

    assert!(
      matches!(err, BundleError::Config(ConfigError::Invalid { ref key, .. }) if key == "output"),
      "unexpected error {:?}",
      err
    );
  }
  assert!(!output.path().exists());
  assert!(!module.path().join(".npm-calls").exists());
}

#[tokio::test]
async fn compile_failure_stops_before_post_build() {
  let env = TestEnv::new();
  env.write_module_file("package.json", r#"{ "scripts": { "build": "fail-build" } }"#);
  env.write_module_file("src/index.ts", "oops");
  let output = env.output();

  let err = typed_local(&env)
    .run(&ProcessRunner, &env.module(), &output, None)
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    BundleError::Execute(ExecuteError::CmdFailed { code: Some(2), .. })
  ));
  assert!(!output.path().exists());
}

#[tokio::test]
async fn plain_bundle_ships_sources_with_production_deps() {
  let env = TestEnv::new();
  let module = env.plain_module();
  let output = env.output();

  plain_local(&env).run(&ProcessRunner, &module, &output, None).await.unwrap();

  assert_eq!(
    list_files(output.path()),
    vec!["index.js", "node_modules/left-pad/index.js", "package.json"]
  );
}

#[tokio::test]
async fn construct_context_reaches_build_commands() {
  let env = TestEnv::new();
  let module = env.typed_module();
  let output = env.output();
  let ctx = ConstructContext::new().with_var("STAGE", "prod");

  typed_local(&env)
    .run(&ProcessRunner, &module, &output, Some(&ctx))
    .await
    .unwrap();

  assert_eq!(
    std::fs::read_to_string(output.path().join("stage.txt")).unwrap().trim(),
    "prod"
  );
}
