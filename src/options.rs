use std::{
    convert::Infallible,
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

/// Selector value which matches any database entry
pub const SELECT_ALL: &str = "all";

/// Default language mode of the compiler probe
pub const DEFAULT_LANGUAGE: &str = "c++";

/// Default probe timeout in seconds
pub const DEFAULT_PROBE_TIMEOUT: u64 = 30;

#[derive(Debug, Clone)]
pub struct Options {
    /// Compilation database path
    pub database: PathBuf,

    /// Source file selector
    pub selector: Selector,

    /// Output flags file
    pub output: PathBuf,

    /// Compiler probe settings
    pub probe: ProbeConfig,

    /// Detect implicit system include paths
    pub detect_isystem: bool,
}

/// Which database entry to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// First entry in the database
    All,
    /// First entry whose file ends with this string
    Suffix(String),
}

impl Selector {
    pub fn matches(&self, file: impl AsRef<str>) -> bool {
        match self {
            Selector::All => true,
            Selector::Suffix(suffix) => file.as_ref().ends_with(suffix.as_str()),
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == SELECT_ALL {
            Selector::All
        } else {
            Selector::Suffix(s.into())
        })
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Selector::All => f.write_str(SELECT_ALL),
            Selector::Suffix(suffix) => f.write_str(suffix),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Compiler to probe instead of the one in the compile command
    pub compiler: Option<PathBuf>,

    /// Language passed to `-x`
    pub language: String,

    /// Maximum time to wait for the compiler
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            compiler: None,
            language: DEFAULT_LANGUAGE.into(),
            timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_a_sentinel() {
        assert_eq!("all".parse::<Selector>().unwrap(), Selector::All);
        assert_eq!("ALL".parse::<Selector>().unwrap(), Selector::Suffix("ALL".into()));
    }

    #[test]
    fn suffix_matches_by_string_not_component() {
        let selector = Selector::Suffix("a.cpp".into());
        assert!(selector.matches("/p/foo/a.cpp"));
        assert!(selector.matches("/p/xa.cpp"));
        assert!(!selector.matches("/p/a.cc"));
    }

    #[test]
    fn all_matches_anything() {
        assert!(Selector::All.matches(""));
        assert!(Selector::All.matches("/src/main.c"));
    }
}
