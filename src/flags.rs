use std::{
    env::current_dir,
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Component, Path, PathBuf},
    sync::OnceLock,
};
use regex::Regex;
use log::*;

/// Preprocessor flag passed through to the binding generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flag {
    /// `-I<path>`
    Include(PathBuf),
    /// `-D<name>[=<value>]`
    Define(String),
}

impl Display for Flag {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        use Flag::*;

        match self {
            Include(path) => write!(f, "-I{}", path.display()),
            Define(name) => write!(f, "-D{}", name),
        }
    }
}

fn flag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^-([ID])(.*)$").unwrap())
}

/// Extract include and define flags from compiler arguments
///
/// Relative include paths are resolved against `directory`. Everything else
/// besides includes and defines is dropped.
pub fn resolve(args: &[String], directory: impl AsRef<Path>) -> Vec<Flag> {
    let directory = directory.as_ref();
    let regex = flag_regex();

    let mut flags = Vec::new();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        let caps = match regex.captures(arg) {
            Some(caps) => caps,
            None => {
                trace!("Drop argument: `{}`", arg);
                continue;
            }
        };

        let value = match &caps[2] {
            "" => match args.next() {
                Some(value) => value.as_str(),
                None => {
                    warn!("Missing value for trailing `{}`", arg);
                    break;
                }
            },
            value => value,
        };

        let flag = if &caps[1] == "I" {
            Flag::Include(absolutize(directory, value))
        } else {
            Flag::Define(value.into())
        };

        debug!("Resolved flag: `{}`", flag);
        flags.push(flag);
    }

    flags
}

/// Make path absolute relative to base and strip `.` and `..` segments
///
/// Absolute paths are returned untouched.
pub fn absolutize(base: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if path.is_absolute() {
        return path.into();
    }

    let mut full = base.as_ref().join(path);

    if full.is_relative() {
        if let Ok(cwd) = current_dir() {
            full = cwd.join(full);
        }
    }

    normalize(&full)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => (),
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            _ => out.push(component),
        }
    }

    out
}
