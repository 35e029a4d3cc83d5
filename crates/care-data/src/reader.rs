//! Input file discovery and loading.
//!
//! Inputs are small, so every file is read whole before parsing. File names
//! are matched case-insensitively against a fixed candidate list per input.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use care_core::error::{CareError, Result};

// ── InputKind ─────────────────────────────────────────────────────────────────

/// One of the four inputs a run consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    InfantProfile,
    ParentProfile,
    InfantLog,
    ParentLog,
}

impl InputKind {
    /// File names tried in priority order.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            InputKind::InfantProfile => &["BABY_PROFILE.csv", "baby_profile.csv"],
            InputKind::ParentProfile => &["MUM_PROFILE.CSV", "mama_profile.csv"],
            InputKind::InfantLog => &["baby_data.csv", "BABY_DATA.csv"],
            InputKind::ParentLog => &["mama_data_complete.csv", "MUM_DATA.csv"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputKind::InfantProfile => "Infant profile",
            InputKind::ParentProfile => "Parent profile",
            InputKind::InfantLog => "Infant event log",
            InputKind::ParentLog => "Parent event log",
        }
    }

    /// Profiles are required; event logs may be missing.
    pub fn is_required(&self) -> bool {
        matches!(self, InputKind::InfantProfile | InputKind::ParentProfile)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read a whole input file as UTF-8 text.
pub fn read_input(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|source| CareError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Read an event log, replacing invalid UTF-8 sequences with `U+FFFD`.
///
/// A stray byte only affects the field it sits in, so the rest of the log
/// is still analysed.
pub fn read_log(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| CareError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                "{} is not valid UTF-8 (first bad byte at offset {}); decoding lossily",
                path.display(),
                err.utf8_error().valid_up_to()
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Find the file for `kind` directly inside `dir`.
///
/// Candidates are tried in order; each is compared case-insensitively with
/// the directory's file names. Subdirectories are not searched.
pub fn find_input(dir: &Path, kind: InputKind) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }

    let files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    kind.candidates().iter().find_map(|candidate| {
        files
            .iter()
            .find(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.eq_ignore_ascii_case(candidate))
                    .unwrap_or(false)
            })
            .cloned()
    })
}

/// Resolve `kind` from an explicit override or the first directory that
/// contains a matching file.
pub fn locate_input(
    kind: InputKind,
    explicit: Option<&Path>,
    dirs: &[PathBuf],
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(Some(path.to_path_buf()));
        }
        if kind.is_required() {
            return Err(missing(kind, &path.display().to_string()));
        }
        warn!("{} {} does not exist", kind.label(), path.display());
        return Ok(None);
    }

    if let Some(found) = dirs.iter().find_map(|dir| find_input(dir, kind)) {
        debug!("{}: {}", kind.label(), found.display());
        return Ok(Some(found));
    }

    if kind.is_required() {
        Err(missing(kind, &kind.candidates().join(", ")))
    } else {
        Ok(None)
    }
}

fn missing(kind: InputKind, candidates: &str) -> CareError {
    CareError::MissingInput {
        kind: kind.label().to_string(),
        candidates: candidates.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    // ── read_input ────────────────────────────────────────────────────────────

    #[test]
    fn test_read_input() {
        let dir = TempDir::new().unwrap();
        let path = touch(dir.path(), "baby_data.csv", "date,time,activity\n");
        assert_eq!(read_input(&path).unwrap(), "date,time,activity\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_input(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, CareError::FileRead { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    // ── read_log ──────────────────────────────────────────────────────────────

    #[test]
    fn test_read_log_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baby_data.csv");
        fs::write(&path, b"date,time,activity\n2024-06-10,07:00,note,caf\xe9\n").unwrap();

        assert!(read_input(&path).is_err());
        let text = read_log(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("caf\u{FFFD}\n"));
    }

    #[test]
    fn test_read_log_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_log(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, CareError::FileRead { .. }));
    }

    // ── find_input ────────────────────────────────────────────────────────────

    #[test]
    fn test_find_input_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Mum_Profile.csv", "");
        let found = find_input(dir.path(), InputKind::ParentProfile).unwrap();
        assert_eq!(found.file_name().unwrap(), "Mum_Profile.csv");
    }

    #[test]
    fn test_find_input_candidate_priority() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "MUM_DATA.csv", "");
        touch(dir.path(), "mama_data_complete.csv", "");
        let found = find_input(dir.path(), InputKind::ParentLog).unwrap();
        assert_eq!(found.file_name().unwrap(), "mama_data_complete.csv");
    }

    #[test]
    fn test_find_input_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("old");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "baby_data.csv", "");
        assert!(find_input(dir.path(), InputKind::InfantLog).is_none());
    }

    #[test]
    fn test_find_input_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(find_input(&dir.path().join("absent"), InputKind::InfantLog).is_none());
    }

    // ── locate_input ──────────────────────────────────────────────────────────

    #[test]
    fn test_locate_required_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let err = locate_input(InputKind::InfantProfile, None, &[dir.path().to_path_buf()])
            .unwrap_err();
        assert!(err.to_string().contains("BABY_PROFILE.csv"));
    }

    #[test]
    fn test_locate_optional_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let found = locate_input(InputKind::InfantLog, None, &[dir.path().to_path_buf()]).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_locate_searches_dirs_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        touch(second.path(), "baby_profile.csv", "");
        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = locate_input(InputKind::InfantProfile, None, &dirs).unwrap().unwrap();
        assert!(found.starts_with(second.path()));
    }

    #[test]
    fn test_locate_explicit_override() {
        let dir = TempDir::new().unwrap();
        let custom = touch(dir.path(), "my-baby.csv", "");
        let found = locate_input(InputKind::InfantLog, Some(&custom), &[]).unwrap();
        assert_eq!(found, Some(custom));

        let absent = dir.path().join("absent.csv");
        assert!(locate_input(InputKind::ParentProfile, Some(&absent), &[]).is_err());
        assert_eq!(locate_input(InputKind::ParentLog, Some(&absent), &[]).unwrap(), None);
    }
}
