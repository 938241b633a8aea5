use anyhow::Result;
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ScannedDocument {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub no_ignore: bool,
}

impl ScanOptions {
    pub fn new(no_ignore: bool) -> Self {
        Self { no_ignore }
    }
}

/// Collects the `.cs` documents of one project directory. Build output and
/// VCS directories are always excluded; ignore files apply unless disabled.
pub fn scan_project(
    root: &Path,
    project_dir: &Path,
    options: ScanOptions,
) -> Result<Vec<ScannedDocument>> {
    let mut documents = Vec::new();
    let mut builder = WalkBuilder::new(project_dir);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let walker = builder
        .hidden(false)
        .filter_entry(|entry| !is_ignored_entry(entry))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                eprintln!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(OsStr::to_str) != Some("cs") {
            continue;
        }
        let rel_path = crate::util::normalize_rel_path(root, path)
            .unwrap_or_else(|_| crate::util::normalize_path(path));
        let file_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        documents.push(ScannedDocument {
            rel_path,
            abs_path: path.to_path_buf(),
            file_name,
            size,
        });
    }
    documents.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(documents)
}

fn is_ignored_entry(entry: &ignore::DirEntry) -> bool {
    match entry.file_name() {
        name if name == OsStr::new(".git") => true,
        name if name == OsStr::new(".vs") => true,
        name if name == OsStr::new("bin") => true,
        name if name == OsStr::new("obj") => true,
        _ => false,
    }
}

/// Documents emitted by source generators or designers carry only
/// compiler-synthesized declarations and are never candidate sources.
pub fn is_generated_document(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".g.cs")
        || lower.ends_with(".g.i.cs")
        || lower.ends_with(".generated.cs")
        || lower.ends_with(".designer.cs")
}
