//! Build through cargo

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::info;

use crate::{
    build::BuildService,
    constants::WASM_TARGET_TRIPLE,
    errors::ScriptError,
    utils::command_success_or,
};

/// Builds the contract with cargo, without going through the shell script
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WasmBuilder {
    /// Workspace holding the contract package
    workspace_path: PathBuf,
    /// Package to build
    package: String,
    /// Where the resulting wasm is copied
    output_path: PathBuf,
}

impl WasmBuilder {
    /// Builder of `package` in `workspace_path`, copying the wasm to `output_path`
    pub fn new(
        workspace_path: impl Into<PathBuf>,
        package: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        WasmBuilder {
            workspace_path: workspace_path.into(),
            package: package.into(),
            output_path: output_path.into(),
        }
    }

    /// Build the wasm file
    fn build_initial_wasm(&self) -> Result<PathBuf, ScriptError> {
        let mut build_cmd = Command::new("cargo");
        build_cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        build_cmd.current_dir(&self.workspace_path);
        // Invoke the build command
        build_cmd.arg("build");
        // Use the release profile
        build_cmd.arg("--release");
        build_cmd.arg("-p");
        build_cmd.arg(&self.package);
        // Set the build target to WASM
        build_cmd.arg("--target");
        build_cmd.arg(WASM_TARGET_TRIPLE);
        // Strip the symbols, the contract size is paid in storage
        build_cmd.env("RUSTFLAGS", "-C link-arg=-s");

        command_success_or(build_cmd, "Failed to build contract WASM")?;

        let target_dir = self
            .workspace_path
            .join("target")
            .join(WASM_TARGET_TRIPLE)
            .join("release");

        find_wasm(&target_dir, &self.package)
    }
}

impl BuildService for WasmBuilder {
    fn build(&self) -> Result<(), ScriptError> {
        let wasm_file_path = self.build_initial_wasm()?;

        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;
        }
        fs::copy(&wasm_file_path, &self.output_path)
            .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;

        info!(
            "Copied {} to {}",
            wasm_file_path.display(),
            self.output_path.display()
        );
        Ok(())
    }
}

/// Find the wasm of `package` in a cargo output directory
fn find_wasm(target_dir: &Path, package: &str) -> Result<PathBuf, ScriptError> {
    let expected = target_dir.join(format!("{}.wasm", package.replace('-', "_")));
    if !expected.exists() {
        return Err(ScriptError::ContractCompilation(format!(
            "Could not find contract WASM file {}",
            expected.display()
        )));
    }

    Ok(expected)
}
