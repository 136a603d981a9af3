/// Name of the per-module configuration file looked up next to the sources.
pub const CONFIG_FILE_NAME: &str = "assetpack.json";

/// Mount point of the module sources inside the build container.
pub const CONTAINER_INPUT_DIR: &str = "/asset-input";

/// Mount point of the artifact directory inside the build container.
pub const CONTAINER_OUTPUT_DIR: &str = "/asset-output";

pub const DEFAULT_CONTAINER_ENGINE: &str = "docker";
pub const DEFAULT_CONTAINER_IMAGE: &str = "public.ecr.aws/sam/build-nodejs20.x";

/// Shell used inside the container to run a joined phase.
pub const CONTAINER_SHELL: &str = "bash";

#[cfg(unix)]
pub const DEFAULT_LOCAL_SHELL: &str = "/bin/sh";

#[cfg(windows)]
pub const DEFAULT_LOCAL_SHELL: &str = "sh";

pub const DEFAULT_PACKAGE_MANAGER: &str = "npm";
pub const DEFAULT_DEPENDENCY_DIR: &str = "node_modules";
pub const DEFAULT_COMPILED_DIR: &str = "dist";
pub const DEFAULT_BUILD_SCRIPT: &str = "build";
