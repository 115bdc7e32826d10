use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};
use serde::Deserialize;
use log::*;
use crate::{Error, Result, Selector};

/// Single `compile_commands.json` entry
#[derive(Debug, Clone, Deserialize)]
pub struct CompileCommand {
    /// Working directory of the compilation
    pub directory: PathBuf,

    /// Main translation unit source
    pub file: String,

    /// Shell-escaped compiler invocation
    #[serde(default)]
    pub command: Option<String>,

    /// Pre-split compiler invocation
    #[serde(default)]
    pub arguments: Option<Vec<String>>,

    /// Compilation output
    #[serde(default)]
    pub output: Option<String>,
}

impl CompileCommand {
    /// Compiler invocation as argument list
    ///
    /// The `command` string takes precedence over `arguments` unless it is empty.
    pub fn arguments(&self) -> Result<Vec<String>> {
        let args = match (&self.command, &self.arguments) {
            (Some(command), _) if !command.is_empty() => shlex::split(command)
                .ok_or_else(|| Error::Command(format!("unbalanced quoting in `{}`", command)))?,
            (_, Some(arguments)) => arguments.clone(),
            _ => return Err(Error::Command(format!("no command or arguments for `{}`", self.file))),
        };

        if args.is_empty() {
            return Err(Error::Command(format!("empty command for `{}`", self.file)));
        }

        Ok(args)
    }
}

/// Compilation database
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Database {
    entries: Vec<CompileCommand>,
}

impl Database {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Load compilation database: `{}`", path.display());

        let db = Self::from_json(&read_to_string(path)?)?;
        debug!("Loaded {} entries", db.entries().len());
        Ok(db)
    }

    pub fn from_json(src: impl AsRef<str>) -> Result<Self> {
        Ok(serde_json::from_str(src.as_ref())?)
    }

    pub fn entries(&self) -> &[CompileCommand] {
        &self.entries
    }

    /// First entry matching selector
    pub fn find(&self, selector: &Selector) -> Option<&CompileCommand> {
        self.entries.iter().find(|entry| selector.matches(&entry.file))
    }
}
