use crate::analyzer::handler::{self, HandlerMatch};
use crate::analyzer::project;
use crate::model::{
    Candidate, CandidateCompact, ClassificationResult, ProjectLabel, UsageSite, Verdict,
};
use crate::workspace::Workspace;
use anyhow::Result;

/// One reference location, still unresolved: a document id plus the line the
/// candidate's name occurs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefLocation {
    pub document: usize,
    pub line: i64,
}

/// Finds every location in the workspace where a candidate is referenced.
/// A seam rather than a function so the per-candidate failure policy stays
/// testable with resolvers that misbehave.
pub trait ReferenceResolver: Sync {
    fn find_references(
        &self,
        workspace: &Workspace,
        candidate: &Candidate,
    ) -> Result<Vec<RefLocation>>;
}

/// Resolver backed by the workspace's identifier-occurrence index. Matches
/// by simple name, the same textual net the rest of the pipeline assumes;
/// declaration-name tokens were never indexed, so they cannot show up here.
pub struct IndexResolver;

impl ReferenceResolver for IndexResolver {
    fn find_references(
        &self,
        workspace: &Workspace,
        candidate: &Candidate,
    ) -> Result<Vec<RefLocation>> {
        let mut locations = Vec::new();
        for (doc_id, doc) in workspace.documents.iter().enumerate() {
            for span in doc.index.occurrences(&candidate.name) {
                locations.push(RefLocation {
                    document: doc_id,
                    line: span.start_line,
                });
            }
        }
        Ok(locations)
    }
}

/// Reduces one candidate's usage sites to a verdict. Test-project sites and
/// handler-matched sites never disqualify; the first remaining site decides
/// InUse and ends the scan. Zero sites is Isolated by the same rule.
pub fn classify_candidate(
    workspace: &Workspace,
    candidate: &Candidate,
    resolver: &dyn ReferenceResolver,
) -> Result<ClassificationResult> {
    let locations = resolver.find_references(workspace, candidate)?;

    let mut usage_sites = Vec::new();
    let mut warnings = Vec::new();
    let mut verdict = Verdict::Isolated;

    for location in locations {
        let Some(doc) = workspace.document(location.document) else {
            continue;
        };
        let proj = workspace.project_of(doc);
        let label = project::classify(&proj.name);
        usage_sites.push(UsageSite {
            project: proj.name.clone(),
            label,
            rel_path: doc.rel_path.clone(),
            file_name: doc.file_name.clone(),
            line: location.line,
        });
        if label == ProjectLabel::Test {
            continue;
        }
        match handler::match_usage(&doc.index, &candidate.name) {
            HandlerMatch::Matched => {}
            HandlerMatch::NotMatched => {
                verdict = Verdict::InUse;
                break;
            }
            HandlerMatch::Ambiguous { handlers } => {
                warnings.push(format!(
                    "{}: {} declares {} Handler-suffixed classes; usage at line {} cannot be attributed to a single handler",
                    candidate.id.qualname, doc.rel_path, handlers, location.line
                ));
                verdict = Verdict::InUse;
                break;
            }
        }
    }

    Ok(ClassificationResult {
        candidate: CandidateCompact::from(candidate),
        verdict,
        usage_sites,
        warnings,
    })
}
