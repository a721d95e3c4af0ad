//! Locate a built jar under a project's `target/` directory.
//!
//! sbt puts artifacts under `target/scala-<version>/`, maven directly under
//! `target/`, and the two may name them with different prefixes.

use std::path::{Path, PathBuf};

use framecheck_core::config::HarnessConfig;

use crate::error::{HarnessError, Result};

/// Secondary artifacts that never count as the build output.
const IGNORED_SUFFIXES: [&str; 4] = ["javadoc.jar", "sources.jar", "test-sources.jar", "tests.jar"];

/// The single jar matching either layout under `home/project`.
///
/// `Ok(None)` when nothing matches; `MultipleArtifacts` when more than one
/// candidate remains after dropping secondary artifacts.
pub fn search_artifact(
    home: &Path,
    project: &str,
    sbt_prefix: &str,
    mvn_prefix: &str,
) -> Result<Option<PathBuf>> {
    let project_dir = home.join(project);
    let sbt = project_dir
        .join("target")
        .join("scala-*")
        .join(format!("{}*.jar", glob::Pattern::escape(sbt_prefix)));
    let mvn = project_dir
        .join("target")
        .join(format!("{}*.jar", glob::Pattern::escape(mvn_prefix)));

    let mut jars = Vec::new();
    for pattern in [sbt, mvn] {
        let pattern = pattern.to_string_lossy();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) if !is_ignored(&path) => jars.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "unreadable path while searching artifacts"),
            }
        }
    }

    tracing::debug!(project, candidates = jars.len(), "artifact search finished");
    match jars.len() {
        0 => Ok(None),
        1 => Ok(jars.pop()),
        _ => Err(HarnessError::MultipleArtifacts(jars)),
    }
}

/// [`search_artifact`] rooted at the configured build home.
pub fn search_jar(
    config: &HarnessConfig,
    project: &str,
    sbt_prefix: &str,
    mvn_prefix: &str,
) -> Result<Option<PathBuf>> {
    let home = config.require_home()?;
    search_artifact(home, project, sbt_prefix, mvn_prefix)
}

fn is_ignored(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    IGNORED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
