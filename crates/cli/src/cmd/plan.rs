//! Implementation of the `assetpack plan` command.
//!
//! Prints the commands of every phase without running anything. Without
//! `--env` both compositions are shown.

use anyhow::Result;

use assetpack_lib::{PhasePlan, PipelineSpec};

use crate::cmd::TargetArgs;
use crate::output::{OutputFormat, print_command, print_heading, print_json};

pub fn cmd_plan(args: &TargetArgs, output: OutputFormat) -> Result<()> {
  let config = args.resolve_config()?;
  let options = args.options(&config)?;
  let module = args.module();
  let out = args.output();
  let context = config.construct_context();

  if args.environment.is_some() {
    let pipeline = options.select(config.environment)?;
    let spec = pipeline.describe(&module, &out, Some(&context));
    if output.is_json() {
      return print_json(&spec);
    }
    print_heading(&format!("Plan: {} ({})", module.name(), options.flavor()));
    print_pipeline(&spec);
    return Ok(());
  }

  let spec = options.bundling_spec(&module, &out, Some(&context));
  if output.is_json() {
    return print_json(&spec);
  }

  print_heading(&format!("Plan: {} ({})", spec.module, spec.flavor));
  print_pipeline(&spec.container);
  println!();
  print_pipeline(&spec.local);
  Ok(())
}

fn print_pipeline(spec: &PipelineSpec) {
  println!("{}:", spec.environment);
  for PhasePlan { phase, commands } in &spec.phases {
    if commands.is_empty() {
      println!("  {}: (none)", phase);
      continue;
    }
    println!("  {}:", phase);
    for command in commands {
      print_command(command);
    }
  }
}
