//! Property-based tests for path cleaning, containment and round trips.
//!
//! These tests use proptest to generate arbitrary inputs and verify
//! the path-safety properties hold across a wide range of cases.

#![allow(clippy::expect_used)]

use dirpack_core::ArchiveConfig;
use dirpack_core::archive;
use dirpack_core::test_utils::write_file;
use dirpack_core::types::DestDir;
use dirpack_core::types::SafePath;
use dirpack_core::types::clean_path;
use dirpack_core::unarchive;
use proptest::prelude::*;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn create_test_dest() -> (TempDir, DestDir) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dest = DestDir::new(temp.path()).expect("failed to create dest");
    (temp, dest)
}

fn component() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["a", "b", "cc", ".", ".."])
}

/// Lowest depth reached while walking the components from the root.
fn min_depth(components: &[&str]) -> i32 {
    let mut depth = 0;
    let mut lowest = 0;
    for c in components {
        match *c {
            "." => {}
            ".." => depth -= 1,
            _ => depth += 1,
        }
        lowest = lowest.min(depth);
    }
    lowest
}

proptest! {
    /// Cleaning is idempotent.
    #[test]
    fn prop_clean_is_idempotent(parts in prop::collection::vec(component(), 0..12)) {
        let path = PathBuf::from(parts.join("/"));
        let once = clean_path(&path);
        prop_assert_eq!(clean_path(&once), once);
    }

    /// A cleaned relative path only has `..` as a leading run and no `.`
    /// unless it is exactly `.`.
    #[test]
    fn prop_clean_is_canonical(parts in prop::collection::vec(component(), 0..12)) {
        let cleaned = clean_path(&PathBuf::from(parts.join("/")));
        if cleaned == Path::new(".") {
            return Ok(());
        }
        let comps: Vec<_> = cleaned.components().collect();
        prop_assert!(!comps.contains(&Component::CurDir));
        let first_normal = comps
            .iter()
            .position(|c| matches!(c, Component::Normal(_)))
            .unwrap_or(comps.len());
        prop_assert!(comps[first_normal..]
            .iter()
            .all(|c| matches!(c, Component::Normal(_))));
    }

    /// An entry name is accepted exactly when it never climbs above the
    /// destination, and an accepted target always lies beneath it.
    #[test]
    fn prop_containment_matches_depth(parts in prop::collection::vec(component(), 1..10)) {
        let (_temp, dest) = create_test_dest();
        let name = PathBuf::from(parts.join("/"));
        let result = SafePath::resolve(&name, &dest);

        prop_assert_eq!(result.is_ok(), min_depth(&parts) >= 0, "name: {}", name.display());
        if let Ok(safe) = result {
            prop_assert!(safe.as_path().starts_with(dest.as_path()));
            prop_assert_eq!(dest.as_path().join(safe.relative()), safe.as_path());
        }
    }

    /// Plain relative names are always accepted unchanged.
    #[test]
    fn prop_plain_names_accepted(
        parts in prop::collection::vec("[a-zA-Z0-9_-]{1,20}", 1..6)
    ) {
        let (_temp, dest) = create_test_dest();
        let name = PathBuf::from(parts.join("/"));
        let safe = SafePath::resolve(&name, &dest).expect("plain name");
        prop_assert_eq!(safe.relative(), name.as_path());
    }

    /// Absolute names are always rejected.
    #[cfg(unix)]
    #[test]
    fn prop_absolute_rejected(
        parts in prop::collection::vec("[a-z]{1,8}", 0..5)
    ) {
        let (_temp, dest) = create_test_dest();
        let name = PathBuf::from(format!("/{}", parts.join("/")));
        prop_assert!(SafePath::resolve(&name, &dest).is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Archiving then extracting reproduces file names and contents.
    #[test]
    fn prop_round_trip_preserves_content(
        files in prop::collection::btree_map(
            "[a-z]{1,6}(/[a-z]{1,6}){0,2}\\.dat",
            prop::collection::vec(any::<u8>(), 0..2048),
            1..8,
        )
    ) {
        let source = TempDir::new().expect("source dir");
        // Directory components never end in ".dat", so no file name is
        // also a directory of another.
        for (name, data) in &files {
            write_file(source.path(), name, data);
        }

        let mut buf = Vec::new();
        let created = archive(source.path(), &mut buf, &ArchiveConfig::default())
            .expect("archive");
        prop_assert_eq!(created.files_added, files.len());

        let dest = TempDir::new().expect("dest dir");
        let extracted = unarchive(dest.path(), buf.as_slice()).expect("unarchive");
        prop_assert_eq!(extracted.files_extracted, files.len());

        for (name, data) in &files {
            let content = fs::read(dest.path().join(name)).expect("extracted file");
            prop_assert_eq!(&content, data);
        }
    }
}
