mod args;
mod bundle;
mod info;
mod plan;

pub use args::TargetArgs;
pub use bundle::cmd_bundle;
pub use info::cmd_info;
pub use plan::cmd_plan;
