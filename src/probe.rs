use std::{
    io::Read,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::mpsc,
    thread,
    time::Instant,
};
use wait_timeout::ChildExt;
use log::*;
use crate::{Error, ProbeConfig, Result};

const SEARCH_STARTS: &str = "search starts here";
const SEARCH_ENDS: &str = "End of search list.";

/// Ask the compiler for its implicit include search paths
///
/// Runs `<compiler> -x <language> -E -v -` on empty input and scrapes the
/// search list from its diagnostics.
pub fn implicit_includes(compiler: impl AsRef<Path>, config: &ProbeConfig) -> Result<Vec<PathBuf>> {
    let compiler = compiler.as_ref();
    info!("Probe compiler: `{}`", compiler.display());

    let mut child = Command::new(compiler)
        .arg("-x").arg(&config.language).arg("-E").arg("-v").arg("-")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Probe(format!("unable to run `{}`: {}", compiler.display(), e)))?;

    let deadline = Instant::now() + config.timeout;

    // drain stderr so a chatty compiler never blocks on a full pipe
    let (sender, receiver) = mpsc::channel();
    if let Some(mut pipe) = child.stderr.take() {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = sender.send(pipe.read_to_end(&mut buf).map(|_| buf));
        });
    }

    let timed_out = || Error::Probe(format!("`{}` timed out after {:?}", compiler.display(), config.timeout));

    let status = child.wait_timeout(config.timeout)
        .map_err(|e| Error::Probe(format!("unable to wait for `{}`: {}", compiler.display(), e)))?;

    let status = match status {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(timed_out());
        }
    };

    // stderr stays open while any process spawned by the compiler holds it
    let remaining = deadline.saturating_duration_since(Instant::now());
    let out = match receiver.recv_timeout(remaining) {
        Ok(Ok(buf)) => buf,
        Ok(Err(e)) => return Err(Error::Probe(format!("unable to read diagnostics: {}", e))),
        Err(mpsc::RecvTimeoutError::Timeout) => return Err(timed_out()),
        Err(mpsc::RecvTimeoutError::Disconnected) => return Err(Error::Probe("diagnostics reader failed".into())),
    };
    let out = String::from_utf8_lossy(&out);

    if !status.success() {
        debug!("Probe diagnostics:\n{}", out);
        return Err(Error::Probe(format!("`{}` failed with {}", compiler.display(), status)));
    }

    parse_search_list(&out)
}

/// Extract include paths between the search list markers
///
/// A list without the end marker is rejected as a whole, paths collected
/// before the output stopped are not returned.
pub fn parse_search_list(out: &str) -> Result<Vec<PathBuf>> {
    let mut lines = out.lines();

    if !(&mut lines).any(is_search_start) {
        return Err(Error::Probe("no include search list in compiler output".into()));
    }

    let mut paths = Vec::new();

    for line in lines {
        if line.contains(SEARCH_ENDS) {
            return Ok(paths);
        }
        if is_search_start(line) {
            continue;
        }
        let path = line.trim();
        if !path.is_empty() {
            debug!("Implicit include: `{}`", path);
            paths.push(PathBuf::from(path));
        }
    }

    Err(Error::Probe("unterminated include search list in compiler output".into()))
}

fn is_search_start(line: &str) -> bool {
    line.contains("#include") && line.contains(SEARCH_STARTS)
}
