use ignore::WalkBuilder;
use mibscope_core::SourceText;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

fn is_relevant_path(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => !name.starts_with('.'),
        None => true,
    }
}

/// Files without an extension are accepted: MIBs are often named after the
/// module alone (`IF-MIB`).
fn has_mib_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        None => true,
    }
}

/// Every candidate MIB file under `roots`, sorted for stable load order.
pub fn collect_paths(roots: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = roots
        .iter()
        .flat_map(|root| {
            if !root.exists() {
                warn!("Input path does not exist: {}", root.display());
            }
            WalkBuilder::new(root).build()
        })
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.is_file() && is_relevant_path(path) && has_mib_extension(path, extensions) {
                return Some(path.to_path_buf());
            }
            None
        })
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Read the files under `roots`. Bytes that are not UTF-8 are replaced
/// rather than rejected; unreadable files are skipped.
pub fn load_sources(roots: &[PathBuf], extensions: &[String]) -> Vec<SourceText> {
    let paths = collect_paths(roots, extensions);
    debug!("Reading {} candidate files", paths.len());
    paths
        .into_iter()
        .filter_map(|path| match fs::read(&path) {
            Ok(bytes) => Some(SourceText::new(
                path.display().to_string(),
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exts() -> Vec<String> {
        vec!["mib".to_string(), "txt".to_string(), "my".to_string()]
    }

    #[test]
    fn test_collects_matching_files_recursively() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("vendor");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("IF-MIB.txt"), "IF-MIB DEFINITIONS ::= BEGIN END").unwrap();
        fs::write(nested.join("ACME.MIB"), "ACME DEFINITIONS ::= BEGIN END").unwrap();
        fs::write(dir.path().join("SNMPv2-SMI"), "SNMPv2-SMI DEFINITIONS ::= BEGIN END").unwrap();
        fs::write(dir.path().join("notes.md"), "not a mib").unwrap();
        fs::write(dir.path().join(".hidden.mib"), "H DEFINITIONS ::= BEGIN END").unwrap();

        let paths = collect_paths(&[dir.path().to_path_buf()], &exts());
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"ACME.MIB".to_string()));
        assert!(names.contains(&"SNMPv2-SMI".to_string()));
        assert!(!names.contains(&"notes.md".to_string()));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("LATIN.mib");
        let mut bytes = b"LATIN-MIB DEFINITIONS ::= BEGIN\n-- caf".to_vec();
        bytes.push(0xe9);
        bytes.extend_from_slice(b"\nEND\n");
        fs::write(&file, bytes).unwrap();

        let sources = load_sources(&[file.clone()], &exts());
        assert_eq!(sources.len(), 1);
        assert!(sources[0].text.contains('\u{FFFD}'));
        assert_eq!(sources[0].label, file.display().to_string());
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempdir().unwrap();
        let sources = load_sources(&[dir.path().join("absent")], &exts());
        assert!(sources.is_empty());
    }
}
