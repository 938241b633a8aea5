use crate::analyzer::project;
use crate::model::{Candidate, Coverage, DeclSite, ProjectLabel, SymbolId};
use crate::workspace::Workspace;
use std::collections::BTreeMap;

const CANDIDATE_SUFFIXES: &[&str] = &["Query", "Command"];

/// Collects the audited request types: declarations in Production projects
/// whose name ends with "Application", excluding generated documents, with
/// a simple name ending in one of the recognized suffixes (ordinal match).
/// Partial declarations of one type merge under a single symbol id. The
/// returned coverage lists every project and document the workspace loader
/// had to skip; the candidate set is computed over what did load.
pub fn collect(workspace: &Workspace) -> (BTreeMap<SymbolId, Candidate>, Coverage) {
    let mut candidates: BTreeMap<SymbolId, Candidate> = BTreeMap::new();
    for proj in &workspace.projects {
        if project::classify(&proj.name) != ProjectLabel::Production {
            continue;
        }
        if !project::is_application_project(&proj.name) {
            continue;
        }
        for &doc_id in &proj.documents {
            let doc = &workspace.documents[doc_id];
            if doc.generated {
                continue;
            }
            for decl in &doc.index.types {
                if !has_candidate_suffix(&decl.name) {
                    continue;
                }
                let id = SymbolId {
                    project: proj.name.clone(),
                    qualname: decl.qualname.clone(),
                    arity: decl.arity,
                };
                candidates
                    .entry(id.clone())
                    .or_insert_with(|| Candidate {
                        id,
                        name: decl.name.clone(),
                        decl_sites: Vec::new(),
                    })
                    .decl_sites
                    .push(DeclSite {
                        document: doc_id,
                        name_span: decl.name_span,
                    });
            }
        }
    }
    (candidates, workspace.coverage.clone())
}

fn has_candidate_suffix(name: &str) -> bool {
    CANDIDATE_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}
