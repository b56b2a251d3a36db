//! Library code logs through `log`; only the CLI and the binaries print

use std::fs;
use std::path::{Path, PathBuf};

fn rust_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap_or_else(|_| panic!("Failed to read {}", dir.display())) {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_files(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

#[test]
fn test_no_println_in_library_modules() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut files = Vec::new();
    for module in ["protocols", "discovery", "dispatch", "registry", "server/routes"] {
        rust_files(&root.join(module), &mut files);
    }
    assert!(!files.is_empty());

    for file in &files {
        let content = fs::read_to_string(file).unwrap();
        let offending: Vec<_> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let line = line.trim_start();
                !line.starts_with("//") && (line.contains("println!") || line.contains("eprintln!"))
            })
            .map(|(n, _)| n + 1)
            .collect();

        assert!(
            offending.is_empty(),
            "Found println!/eprintln! in {}: lines {:?}; use log macros instead",
            file.display(),
            offending
        );
    }
}
