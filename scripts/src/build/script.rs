//! Build through the project shell script

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::{build::BuildService, errors::ScriptError, utils::command_success_or};

/// Builds the contract by running a shell script
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptBuilder {
    /// Script to run
    script: PathBuf,
    /// Shell running it
    shell: String,
}

impl ScriptBuilder {
    /// Builder running `script` with bash
    pub fn new(script: impl Into<PathBuf>) -> Self {
        ScriptBuilder {
            script: script.into(),
            shell: "bash".to_string(),
        }
    }

    /// Run the script with another shell
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl BuildService for ScriptBuilder {
    fn build(&self) -> Result<(), ScriptError> {
        let mut build_cmd = Command::new(&self.shell);
        build_cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        build_cmd.arg(&self.script);

        command_success_or(build_cmd, "build script exited with an error")
    }
}
