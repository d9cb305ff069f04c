//! Glob-driven copy engine shared by every phase
//!
//! A phase is an ordered list of compiled rules applied against one source
//! root and one destination root. Rules run in declaration order, so when two
//! rules produce the same destination path the later one wins.
//!
//! Files whose destination already holds identical bytes (BLAKE3) are left
//! alone, which keeps repeated runs from touching the tree at all.

use crate::context::PhaseContext;
use crate::pattern::CompiledRule;
use pkgrecipe_errors::{Error, RecipeError, Result};
use pkgrecipe_events::{AppEvent, EventEmitter, RecipeEvent, RecipePhase};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// What a phase does when a rule's source directory is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSourcePolicy {
    /// Abort before anything is written
    Fail,
    /// Treat the rule as matching nothing
    Skip,
}

/// Outcome of one phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Destination paths that were written
    pub copied: Vec<PathBuf>,
    /// Destination paths that already held identical contents
    pub unchanged: Vec<PathBuf>,
    /// Source directories that did not exist (only under `Skip`)
    pub skipped_sources: Vec<PathBuf>,
}

impl CopyReport {
    /// True when no file matched any rule
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty() && self.unchanged.is_empty()
    }

    /// Append another report, keeping order
    pub fn merge(&mut self, other: CopyReport) {
        self.copied.extend(other.copied);
        self.unchanged.extend(other.unchanged);
        self.skipped_sources.extend(other.skipped_sources);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyOutcome {
    Copied,
    Unchanged,
}

/// Apply `rules` from `root` into `dest`
///
/// With `MissingSourcePolicy::Fail` every rule's source directory is checked
/// before the first file is written, so a missing one leaves `dest` as it was.
/// A source directory that resolves outside `root` is rejected the same way
/// under either policy. Failures after that point are not rolled back.
///
/// # Errors
///
/// Returns `RecipeError::MissingSourceDirectory` under `Fail`,
/// `RecipeError::PathEscapesRoot` for a source or destination reached through
/// a symlink, and an I/O error if walking the source tree or writing a file
/// fails.
pub(crate) fn copy_rules(
    rules: &[CompiledRule],
    root: &Path,
    dest: &Path,
    policy: MissingSourcePolicy,
    phase: RecipePhase,
    ctx: &PhaseContext,
) -> Result<CopyReport> {
    let mut report = CopyReport::default();

    let mut sources = Vec::with_capacity(rules.len());
    for rule in rules {
        let source = root.join(&rule.rule().source_dir);
        if source.is_dir() {
            sources.push(Some(contained_source(root, &source)?));
            continue;
        }
        match policy {
            MissingSourcePolicy::Fail => {
                return Err(RecipeError::MissingSourceDirectory {
                    path: source.display().to_string(),
                }
                .into());
            }
            MissingSourcePolicy::Skip => {
                debug!(%phase, path = %source.display(), "source directory absent, rule skipped");
                ctx.emit(AppEvent::Recipe(RecipeEvent::SourceSkipped {
                    phase,
                    path: source.clone(),
                }));
                report.skipped_sources.push(source);
                sources.push(None);
            }
        }
    }

    for (rule, source) in rules.iter().zip(sources) {
        let Some(source) = source else {
            continue;
        };

        for (from, to) in plan(rule, &source, dest)? {
            match copy_file(&from, &to)? {
                CopyOutcome::Copied => {
                    debug!(%phase, from = %from.display(), to = %to.display(), "copied");
                    ctx.emit(AppEvent::Recipe(RecipeEvent::FileCopied {
                        phase,
                        source: from,
                        destination: to.clone(),
                    }));
                    report.copied.push(to);
                }
                CopyOutcome::Unchanged => {
                    ctx.emit(AppEvent::Recipe(RecipeEvent::FileUnchanged {
                        phase,
                        destination: to.clone(),
                    }));
                    report.unchanged.push(to);
                }
            }
        }
    }

    Ok(report)
}

/// Resolve `source` and require that it stays under `root`
///
/// The walk starts from the resolved path, so a symlinked rule directory can
/// only point elsewhere inside the root.
fn contained_source(root: &Path, source: &Path) -> Result<PathBuf> {
    let canonical_root = fs::canonicalize(root).map_err(|e| Error::io_with_path(&e, root))?;
    let canonical = fs::canonicalize(source).map_err(|e| Error::io_with_path(&e, source))?;
    if !canonical.starts_with(&canonical_root) {
        return Err(RecipeError::PathEscapesRoot {
            path: source.display().to_string(),
        }
        .into());
    }
    Ok(canonical)
}

/// Collect `(source file, destination file)` pairs for one rule
///
/// The walk finishes before anything is copied, and when `dest` lies inside
/// the source tree its subtree is pruned, so earlier output never feeds back
/// into a rule.
fn plan(rule: &CompiledRule, source: &Path, dest: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let target_dir = dest.join(&rule.rule().destination_dir);
    let nested_dest = fs::canonicalize(dest)
        .ok()
        .filter(|dest| dest.starts_with(source) && dest != source);
    let mut planned = Vec::new();

    let walker = WalkDir::new(source)
        .follow_links(false)
        .follow_root_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            nested_dest
                .as_deref()
                .is_none_or(|nested| !entry.path().starts_with(nested))
        });

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(e, source))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        if !rule.selects(relative) {
            continue;
        }

        let target = if rule.rule().preserve_relative_path {
            target_dir.join(relative)
        } else {
            target_dir.join(entry.file_name())
        };
        planned.push((entry.path().to_path_buf(), target));
    }

    Ok(planned)
}

fn walk_error(err: walkdir::Error, source: &Path) -> Error {
    let path = err
        .path()
        .map_or_else(|| source.to_path_buf(), Path::to_path_buf);
    let io = std::io::Error::from(err);
    Error::io_with_path(&io, path)
}

fn copy_file(from: &Path, to: &Path) -> Result<CopyOutcome> {
    // fs::copy follows a symlink at the destination
    if fs::symlink_metadata(to).is_ok_and(|meta| meta.file_type().is_symlink()) {
        return Err(RecipeError::PathEscapesRoot {
            path: to.display().to_string(),
        }
        .into());
    }

    if same_contents(from, to)? {
        return Ok(CopyOutcome::Unchanged);
    }

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io_with_path(&e, parent))?;
    }
    fs::copy(from, to).map_err(|e| Error::io_with_path(&e, to))?;

    Ok(CopyOutcome::Copied)
}

/// Whether `to` already exists with the same bytes as `from`
fn same_contents(from: &Path, to: &Path) -> Result<bool> {
    let dest_meta = match fs::metadata(to) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io_with_path(&e, to)),
    };
    if !dest_meta.is_file() {
        return Ok(false);
    }

    let src_meta = fs::metadata(from).map_err(|e| Error::io_with_path(&e, from))?;
    if src_meta.len() != dest_meta.len() {
        return Ok(false);
    }

    Ok(file_digest(from)? == file_digest(to)?)
}

fn file_digest(path: &Path) -> Result<blake3::Hash> {
    let file = File::open(path).map_err(|e| Error::io_with_path(&e, path))?;
    let mut hasher = blake3::Hasher::new();
    hasher
        .update_reader(file)
        .map_err(|e| Error::io_with_path(&e, path))?;
    Ok(hasher.finalize())
}
