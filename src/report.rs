use crate::analyzer::project;
use crate::model::{
    AnalysisOutcome, Candidate, Coverage, ProjectLabel, ProjectOverview, SymbolId,
};
use crate::workspace::Workspace;
use anyhow::Result;
use clap::ValueEnum;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Renders the flagged set: one row per isolated candidate, sorted by
/// qualified name, with the distinct usage-site file names joined in order.
pub fn render_analysis(outcome: &AnalysisOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Type", "Referenced in"]);
            let mut rows: Vec<_> = outcome.isolated.iter().collect();
            rows.sort_by(|a, b| a.candidate.qualname.cmp(&b.candidate.qualname));
            for result in rows {
                let files: BTreeSet<&str> = result
                    .usage_sites
                    .iter()
                    .map(|site| site.file_name.as_str())
                    .collect();
                let joined = files.into_iter().collect::<Vec<_>>().join(", ");
                table.add_row(vec![result.candidate.qualname.clone(), joined]);
            }
            let mut out = table.to_string();
            out.push('\n');
            out.push_str(&coverage_footer(&outcome.coverage));
            Ok(out)
        }
    }
}

pub fn render_projects(workspace: &Workspace, format: OutputFormat) -> Result<String> {
    let overviews: Vec<ProjectOverview> = workspace
        .projects
        .iter()
        .map(|proj| {
            let label = project::classify(&proj.name);
            ProjectOverview {
                name: proj.name.clone(),
                label,
                audited: label == ProjectLabel::Production
                    && project::is_application_project(&proj.name),
                documents: proj.documents.len(),
            }
        })
        .collect();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&overviews)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Project", "Label", "Audited", "Documents"]);
            for overview in &overviews {
                let audited = if overview.audited { "yes" } else { "no" };
                table.add_row(vec![
                    overview.name.clone(),
                    label_str(overview.label).to_string(),
                    audited.to_string(),
                    overview.documents.to_string(),
                ]);
            }
            Ok(table.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct CandidateRow {
    qualname: String,
    project: String,
    arity: usize,
    declared_in: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CandidateListing {
    candidates: Vec<CandidateRow>,
    coverage: Coverage,
}

pub fn render_candidates(
    workspace: &Workspace,
    candidates: &BTreeMap<SymbolId, Candidate>,
    coverage: &Coverage,
    format: OutputFormat,
) -> Result<String> {
    let rows: Vec<CandidateRow> = candidates
        .values()
        .map(|candidate| CandidateRow {
            qualname: candidate.id.qualname.clone(),
            project: candidate.id.project.clone(),
            arity: candidate.id.arity,
            declared_in: candidate
                .decl_sites
                .iter()
                .filter_map(|site| {
                    workspace.document(site.document).map(|doc| {
                        format!("{}:{}", doc.rel_path, site.name_span.start_line)
                    })
                })
                .collect(),
        })
        .collect();
    match format {
        OutputFormat::Json => {
            let listing = CandidateListing {
                candidates: rows,
                coverage: coverage.clone(),
            };
            Ok(serde_json::to_string_pretty(&listing)?)
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Type", "Project", "Declared in"]);
            for row in &rows {
                table.add_row(vec![
                    row.qualname.clone(),
                    row.project.clone(),
                    row.declared_in.join(", "),
                ]);
            }
            let mut out = table.to_string();
            out.push('\n');
            out.push_str(&coverage_footer(coverage));
            Ok(out)
        }
    }
}

fn coverage_footer(coverage: &Coverage) -> String {
    if coverage.is_complete() {
        return String::new();
    }
    let mut out = String::new();
    for name in &coverage.skipped_projects {
        out.push_str(&format!("skipped project: {name}\n"));
    }
    for path in &coverage.skipped_documents {
        out.push_str(&format!("skipped document: {path}\n"));
    }
    out
}

fn label_str(label: ProjectLabel) -> &'static str {
    match label {
        ProjectLabel::Production => "Production",
        ProjectLabel::Test => "Test",
    }
}
