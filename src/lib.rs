mod options;
mod result;
mod database;
mod flags;
mod probe;

use std::{
    fs::write,
    path::PathBuf,
};
use log::*;

pub use options::*;
pub use result::*;
pub use database::*;
pub use flags::*;
pub use probe::{implicit_includes, parse_search_list};

/// Outcome of a successful extraction
#[derive(Debug)]
pub struct Extraction {
    /// Source file of the matched entry
    pub file: String,

    /// Flags in the order they were written
    pub flags: Vec<String>,

    /// Written flags file
    pub output: PathBuf,

    /// Why implicit includes are missing, if the probe failed
    pub probe_error: Option<Error>,
}

/// Extract flags for the selected translation unit and write them out
///
/// Nothing is written unless an entry matches.
pub fn extract(options: &Options) -> Result<Extraction> {
    let db = Database::load(&options.database)?;

    let entry = db.find(&options.selector)
        .ok_or_else(|| Error::NoMatch(options.selector.to_string()))?;
    info!("Matched entry: `{}`", entry.file);

    let args = entry.arguments()?;
    let mut flags = resolve(&args, &entry.directory);

    let mut probe_error = None;

    if options.detect_isystem {
        let compiler = options.probe.compiler.clone()
            .unwrap_or_else(|| PathBuf::from(&args[0]));

        match implicit_includes(&compiler, &options.probe) {
            Ok(paths) => {
                info!("Default includes from toolchain: {:?}", paths);
                flags.extend(paths.into_iter().map(Flag::Include));
            }
            Err(e) if e.is_recoverable() => {
                warn!("{}", e);
                probe_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    let flags: Vec<String> = flags.iter().map(|flag| flag.to_string()).collect();

    write(&options.output, flags.join(" "))?;
    info!("Written {} flags to `{}`", flags.len(), options.output.display());

    Ok(Extraction {
        file: entry.file.clone(),
        flags,
        output: options.output.clone(),
        probe_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs::read_to_string, path::Path};
    use tempfile::TempDir;

    fn options(dir: &Path, db: &str, selector: &str) -> Options {
        let database = dir.join("compile_commands.json");
        std::fs::write(&database, db).unwrap();

        Options {
            database,
            selector: selector.parse().unwrap(),
            output: dir.join("flags.txt"),
            probe: ProbeConfig::default(),
            detect_isystem: false,
        }
    }

    #[test]
    fn writes_resolved_flags() {
        let tmp = TempDir::new().unwrap();
        let options = options(
            tmp.path(),
            r#"[{"file":"/p/a.cpp","directory":"/p","arguments":["cc","-Irel","-DX=1","-o","a.o"]}]"#,
            "a.cpp",
        );

        let extraction = extract(&options).unwrap();

        assert_eq!(extraction.flags, ["-I/p/rel", "-DX=1"]);
        assert_eq!(extraction.file, "/p/a.cpp");
        assert!(extraction.probe_error.is_none());
        assert_eq!(read_to_string(&options.output).unwrap(), "-I/p/rel -DX=1");
    }

    #[test]
    fn all_takes_first_entry() {
        let tmp = TempDir::new().unwrap();
        let options = options(
            tmp.path(),
            r#"[
                {"file":"/p/z.c","directory":"/p","command":"cc -DFIRST -c z.c"},
                {"file":"/p/all","directory":"/p","command":"cc -DSECOND -c all"}
            ]"#,
            "all",
        );

        assert_eq!(extract(&options).unwrap().flags, ["-DFIRST"]);
    }

    #[test]
    fn no_match_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let options = options(
            tmp.path(),
            r#"[{"file":"/p/a.cpp","directory":"/p","arguments":["cc","-DX"]}]"#,
            "b.cpp",
        );

        match extract(&options) {
            Err(Error::NoMatch(selector)) => assert_eq!(selector, "b.cpp"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!options.output.exists());
    }

    #[test]
    fn invalid_database_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let options = options(tmp.path(), "[{\"file\": ", "all");

        match extract(&options) {
            Err(Error::Database(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!options.output.exists());
    }

    #[test]
    fn missing_database_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let mut options = options(tmp.path(), "[]", "all");
        options.database = tmp.path().join("missing.json");

        match extract(&options) {
            Err(Error::Io(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_flag_list_writes_empty_file() {
        let tmp = TempDir::new().unwrap();
        let options = options(
            tmp.path(),
            r#"[{"file":"/p/a.c","directory":"/p","command":"cc -O2 -c a.c"}]"#,
            "a.c",
        );

        assert!(extract(&options).unwrap().flags.is_empty());
        assert_eq!(read_to_string(&options.output).unwrap(), "");
    }

    #[test]
    fn failed_probe_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut options = options(
            tmp.path(),
            r#"[{"file":"/p/a.c","directory":"/p","arguments":["/nonexistent/cc","-Iinc"]}]"#,
            "a.c",
        );
        options.detect_isystem = true;

        let extraction = extract(&options).unwrap();

        assert!(matches!(extraction.probe_error, Some(Error::Probe(_))));
        assert_eq!(read_to_string(&options.output).unwrap(), "-I/p/inc");
    }

    #[cfg(unix)]
    #[test]
    fn compiler_override_is_probed() {
        let tmp = TempDir::new().unwrap();
        let mut options = options(
            tmp.path(),
            r#"[{"file":"/p/a.c","directory":"/p","arguments":["/nonexistent/cc","-DA"]}]"#,
            "a.c",
        );
        options.detect_isystem = true;
        options.probe.compiler = Some("false".into());

        match extract(&options).unwrap().probe_error {
            Some(Error::Probe(e)) => assert!(e.contains("false")),
            other => panic!("unexpected probe result: {:?}", other),
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let tmp = TempDir::new().unwrap();
        let options = options(
            tmp.path(),
            r#"[{"file":"/p/a.cpp","directory":"/p/build","command":"c++ -I../inc -I /abs -D NAME=1 -c ../a.cpp"}]"#,
            "a.cpp",
        );

        extract(&options).unwrap();
        let first = std::fs::read(&options.output).unwrap();
        extract(&options).unwrap();
        let second = std::fs::read(&options.output).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, b"-I/p/inc -I/abs -DNAME=1");
    }
}
