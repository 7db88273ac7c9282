//! Recording helper for refreshing the offline chart fixtures.
//! Compiled only when the `test-mode` feature is enabled.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// `TS_FIXDIR` if set, otherwise the crate's `tests/fixtures`.
pub fn fixture_dir() -> PathBuf {
    env::var("TS_FIXDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

pub(crate) fn record_fixture(
    endpoint: &str,
    symbol: &str,
    ext: &str,
    body: &str,
) -> Result<(), std::io::Error> {
    let path = write_fixture(&fixture_dir(), endpoint, symbol, ext, body)?;
    tracing::debug!(path = %path.display(), "TS_RECORD: wrote fixture");
    Ok(())
}

/// Writes `{dir}/{endpoint}_{symbol}.{ext}`, the name `tests/common.rs::fixture` reads back.
fn write_fixture(
    dir: &Path,
    endpoint: &str,
    symbol: &str,
    ext: &str,
    body: &str,
) -> Result<PathBuf, std::io::Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{endpoint}_{symbol}.{ext}"));
    fs::write(&path, body)?;
    Ok(path)
}
