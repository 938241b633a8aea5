use crate::config::Config;
use crate::model::Coverage;
use crate::util;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

pub mod csharp;
pub mod scan;
pub mod sln;

#[derive(Debug)]
pub struct Project {
    pub name: String,
    pub documents: Vec<usize>,
}

#[derive(Debug)]
pub struct Document {
    pub project: usize,
    pub rel_path: String,
    pub file_name: String,
    pub generated: bool,
    pub index: csharp::DocumentIndex,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub no_ignore: bool,
}

impl LoadOptions {
    pub fn new(no_ignore: bool) -> Self {
        Self { no_ignore }
    }
}

/// The loaded program model: projects, their documents, and each document's
/// index. Immutable once built; classification tasks share it by reference.
#[derive(Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub projects: Vec<Project>,
    pub documents: Vec<Document>,
    pub coverage: Coverage,
}

impl Workspace {
    /// Loads a solution: fatal on an unusable solution file, best effort on
    /// everything below it. Projects and documents that cannot be loaded are
    /// skipped and recorded in coverage.
    pub fn load(sln_path: &Path, options: LoadOptions) -> Result<Workspace> {
        if !sln_path.is_file() {
            bail!("solution file not found: {}", sln_path.display());
        }
        let entries = sln::parse_solution_file(sln_path)?;
        let root = sln_path
            .parent()
            .map(Path::to_path_buf)
            .with_context(|| format!("resolve solution directory of {}", sln_path.display()))?;
        let root = std::fs::canonicalize(&root).unwrap_or(root);

        let mut indexer = csharp::CSharpIndexer::new()?;
        let scan_options = scan::ScanOptions::new(options.no_ignore);
        let max_bytes = Config::get().max_file_size_bytes();

        let mut workspace = Workspace {
            root: root.clone(),
            projects: Vec::new(),
            documents: Vec::new(),
            coverage: Coverage::default(),
        };

        for entry in entries {
            let project_id = workspace.projects.len();
            let csproj = root.join(&entry.rel_csproj);
            let Some(project_dir) = csproj.parent().filter(|dir| dir.is_dir()) else {
                workspace.coverage.skipped_projects.push(entry.name.clone());
                workspace.projects.push(Project {
                    name: entry.name,
                    documents: Vec::new(),
                });
                continue;
            };

            let scanned = match scan::scan_project(&root, project_dir, scan_options) {
                Ok(value) => value,
                Err(_) => {
                    workspace.coverage.skipped_projects.push(entry.name.clone());
                    workspace.projects.push(Project {
                        name: entry.name,
                        documents: Vec::new(),
                    });
                    continue;
                }
            };

            let mut documents = Vec::new();
            for doc in scanned {
                if doc.size > max_bytes {
                    workspace.coverage.skipped_documents.push(doc.rel_path);
                    continue;
                }
                let source = match util::read_to_string(&doc.abs_path) {
                    Ok(value) => value,
                    Err(_) => {
                        workspace.coverage.skipped_documents.push(doc.rel_path);
                        continue;
                    }
                };
                let index = match indexer.index(&source) {
                    Ok(value) => value,
                    Err(_) => {
                        workspace.coverage.skipped_documents.push(doc.rel_path);
                        continue;
                    }
                };
                documents.push(workspace.documents.len());
                workspace.documents.push(Document {
                    project: project_id,
                    rel_path: doc.rel_path,
                    generated: scan::is_generated_document(&doc.file_name),
                    file_name: doc.file_name,
                    index,
                });
            }

            workspace.projects.push(Project {
                name: entry.name,
                documents,
            });
        }

        Ok(workspace)
    }

    pub fn document(&self, id: usize) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn project_of(&self, document: &Document) -> &Project {
        &self.projects[document.project]
    }
}
