//! Shared helpers for bundle integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assetpack_lib::{ModuleRef, OutputDir, Toolchain};
use tempfile::TempDir;

/// Stand-in for `npm`.
///
/// - fails with 254 when there is no `package.json`, like the real thing
/// - `install` installs a runtime and a dev-only dependency
/// - `install --omit=dev` / `ci --omit=dev` install only the runtime dependency
/// - `run build` "compiles" `src/**/*.ts` into `dist/**/*.js`, failing when
///   `package.json` mentions `fail-build`; `$STAGE` is written to `dist/stage.txt`
const FAKE_NPM: &str = r#"#!/bin/sh
if [ ! -f package.json ]; then
  echo "npm ERR! enoent Could not read package.json" >&2
  exit 254
fi
echo "$*" >> .npm-calls
case "$1" in
  install|ci)
    mkdir -p node_modules/left-pad
    echo "module.exports = 'pad';" > node_modules/left-pad/index.js
    if [ "$2" != "--omit=dev" ]; then
      mkdir -p node_modules/typescript
      echo "compiler" > node_modules/typescript/tsc.js
    fi
    ;;
  run)
    if grep -q fail-build package.json; then
      echo "error TS2304: Cannot find name 'oops'" >&2
      exit 2
    fi
    for f in $(cd src && find . -name '*.ts'); do
      mkdir -p "dist/$(dirname "$f")"
      cp "src/$f" "dist/${f%.ts}.js"
    done
    if [ -n "$STAGE" ]; then
      echo "$STAGE" > dist/stage.txt
    fi
    ;;
  *)
    echo "unknown command $1" >&2
    exit 1
    ;;
esac
"#;

/// Isolated scratch space with a module, an output directory and a fake toolchain.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let npm = temp.path().join("bin").join("npm");
    std::fs::create_dir_all(npm.parent().unwrap()).unwrap();
    std::fs::write(&npm, FAKE_NPM).unwrap();
    std::fs::set_permissions(&npm, std::fs::Permissions::from_mode(0o755)).unwrap();
    Self { temp }
  }

  pub fn fake_npm(&self) -> PathBuf {
    self.temp.path().join("bin").join("npm")
  }

  pub fn toolchain(&self) -> Toolchain {
    Toolchain {
      package_manager: self.fake_npm().display().to_string(),
      ..Toolchain::default()
    }
  }

  pub fn module_dir(&self) -> PathBuf {
    let p = self.temp.path().join("module");
    std::fs::create_dir_all(&p).unwrap();
    p
  }

  pub fn module(&self) -> ModuleRef {
    ModuleRef::new(self.module_dir())
  }

  pub fn output(&self) -> OutputDir {
    OutputDir::new(self.temp.path().join("out"))
  }

  /// Write a file relative to the module directory.
  pub fn write_module_file(&self, relative_path: &str, content: &str) {
    let path = self.module_dir().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// A typed-script module with a nested source file.
  pub fn typed_module(&self) -> ModuleRef {
    self.write_module_file("package.json", r#"{ "name": "chat", "scripts": { "build": "tsc" } }"#);
    self.write_module_file("src/index.ts", "export const handler = () => 'ok';");
    self.write_module_file("src/lib/util.ts", "export const pad = 1;");
    self.module()
  }

  /// A plain-script module shipped as-is.
  pub fn plain_module(&self) -> ModuleRef {
    self.write_module_file("package.json", r#"{ "name": "authorizer" }"#);
    self.write_module_file("index.js", "exports.handler = async () => ({});");
    self.module()
  }
}

/// Sorted relative paths of every file below `root`.
pub fn list_files(root: &Path) -> Vec<String> {
  let mut files = Vec::new();
  collect(root, root, &mut files);
  files.sort();
  files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<String>) {
  for entry in std::fs::read_dir(dir).unwrap() {
    let path = entry.unwrap().path();
    if path.is_dir() {
      collect(root, &path, files);
    } else {
      files.push(path.strip_prefix(root).unwrap().display().to_string());
    }
  }
}
