use serde::Serialize;

/// Source span of a syntax node, 1-based lines and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_line: i64,
    pub start_col: i64,
    pub end_line: i64,
    pub end_col: i64,
    pub start_byte: i64,
    pub end_byte: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectLabel {
    Production,
    Test,
}

/// Identity of a declared type. Partial declarations of one type share an id;
/// same-named types in different namespaces or projects do not.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SymbolId {
    pub project: String,
    pub qualname: String,
    pub arity: usize,
}

#[derive(Debug, Clone)]
pub struct DeclSite {
    pub document: usize,
    pub name_span: Span,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: SymbolId,
    pub name: String,
    pub decl_sites: Vec<DeclSite>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateCompact {
    pub qualname: String,
    pub name: String,
    pub project: String,
    pub declarations: usize,
}

impl From<&Candidate> for CandidateCompact {
    fn from(candidate: &Candidate) -> Self {
        CandidateCompact {
            qualname: candidate.id.qualname.clone(),
            name: candidate.name.clone(),
            project: candidate.id.project.clone(),
            declarations: candidate.decl_sites.len(),
        }
    }
}

/// One reference location of a candidate, resolved to its owning document.
#[derive(Debug, Clone, Serialize)]
pub struct UsageSite {
    pub project: String,
    pub label: ProjectLabel,
    pub rel_path: String,
    pub file_name: String,
    pub line: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Isolated,
    InUse,
}

#[derive(Debug, Serialize)]
pub struct ClassificationResult {
    pub candidate: CandidateCompact,
    pub verdict: Verdict,
    pub usage_sites: Vec<UsageSite>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// A candidate whose reference resolution failed; the run carries on without it.
#[derive(Debug, Serialize)]
pub struct CandidateFailure {
    pub qualname: String,
    pub project: String,
    pub error: String,
}

/// Projects and documents the loader had to skip. Best-effort traversal is a
/// policy, not an accident; callers can see exactly what the answer omits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Coverage {
    pub skipped_projects: Vec<String>,
    pub skipped_documents: Vec<String>,
}

impl Coverage {
    pub fn is_complete(&self) -> bool {
        self.skipped_projects.is_empty() && self.skipped_documents.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisOutcome {
    pub isolated: Vec<ClassificationResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CandidateFailure>,
    pub coverage: Coverage,
    pub projects: usize,
    pub candidates: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ProjectOverview {
    pub name: String,
    pub label: ProjectLabel,
    pub audited: bool,
    pub documents: usize,
}
