//! Implementation of the `assetpack bundle` command.
//!
//! Resolves configuration, selects a build environment and runs the three
//! build phases for one module. `--dry-run` prints what would be executed
//! instead.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use assetpack_lib::digest::digest_directory;
use assetpack_lib::{BundleError, ExecuteError, Flavor, EnvironmentKind, Pipeline, PipelineSpec, ProcessRunner};

use crate::cmd::TargetArgs;
use crate::output::{
  OutputFormat, format_duration, print_command, print_error, print_info, print_json, print_stat, print_success,
  truncate_hash,
};

#[derive(Debug, Serialize)]
struct BundleSummary {
  module: String,
  flavor: Flavor,
  environment: EnvironmentKind,
  output: String,
  digest: String,
  duration_ms: u128,
}

pub fn cmd_bundle(args: &TargetArgs, dry_run: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  if !args.module.is_dir() {
    bail!("Module directory not found: {}", args.module.display());
  }

  let config = args.resolve_config()?;
  let options = args.options(&config)?;
  let pipeline = options.select(config.environment)?;

  let module = args.module();
  let out = args.output();
  let context = config.construct_context();

  if dry_run {
    let spec = pipeline.describe(&module, &out, Some(&context));
    return print_dry_run(pipeline, &spec, output);
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  if let Err(err) = rt.block_on(pipeline.run(&ProcessRunner, &module, &out, Some(&context))) {
    report_failure(&err);
    return Err(err.into());
  }

  let digest = digest_directory(out.path(), &[]).context("Failed to digest bundle output")?;
  let summary = BundleSummary {
    module: module.name().to_string(),
    flavor: pipeline.flavor(),
    environment: pipeline.environment_kind(),
    output: out.path().display().to_string(),
    digest: digest.0,
    duration_ms: start.elapsed().as_millis(),
  };

  if output.is_json() {
    print_json(&summary)?;
  } else {
    println!();
    print_success("Bundle complete!");
    print_stat("Module", &summary.module);
    print_stat("Flavor", summary.flavor.as_str());
    print_stat("Environment", summary.environment.as_str());
    print_stat("Output", &summary.output);
    print_stat("Digest", truncate_hash(&summary.digest));
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}

fn print_dry_run(pipeline: &Pipeline, spec: &PipelineSpec, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return print_json(spec);
  }

  print_info(&format!(
    "Dry run - {} build in {} environment, nothing executed",
    pipeline.flavor(),
    pipeline.environment_kind()
  ));
  for (phase, invocations) in &spec.invocations {
    if invocations.is_empty() {
      continue;
    }
    println!("{}:", phase);
    for invocation in invocations {
      print_command(&invocation.to_string());
    }
  }

  Ok(())
}

fn report_failure(err: &BundleError) {
  if let BundleError::Execute(ExecuteError::CmdFailed { cmd, code, stderr }) = err {
    let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
    print_error(&format!("Build command failed (exit {}): {}", code, cmd));
    for line in stderr.lines() {
      eprintln!("    {}", line);
    }
  }
}
