use anyhow::{Result, bail};
use deadreq::analyzer::refs::{IndexResolver, RefLocation, ReferenceResolver, classify_candidate};
use deadreq::analyzer::{self, RunOptions, candidates};
use deadreq::model::{Candidate, Verdict};
use deadreq::workspace::{LoadOptions, Workspace};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_solution(root: &Path, projects: &[(&str, &str)]) -> PathBuf {
    let mut content =
        String::from("Microsoft Visual Studio Solution File, Format Version 12.00\n");
    for (name, rel) in projects {
        content.push_str(&format!(
            "Project(\"{{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}}\") = \"{name}\", \"{rel}\", \"{{00000000-0000-0000-0000-000000000001}}\"\n"
        ));
        write_file(root, rel, "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>\n");
    }
    content.push_str("Global\nEndGlobal\n");
    let sln = root.join("Billing.sln");
    fs::write(&sln, content).unwrap();
    sln
}

const CHARGE_COMMAND: &str =
    "namespace Billing.Application { public record ChargeCommand(decimal Amount); }";

const CHARGE_HANDLER: &str = r#"
namespace Billing.Application {
    public class ChargeCommandHandler : IRequestHandler<ChargeCommand, bool> {
        public Task<bool> Handle(ChargeCommand request) {
            return Task.FromResult(request != null);
        }
    }
}
"#;

const CHARGE_TEST: &str = r#"
namespace Billing.Tests {
    public class ChargeCommandTests {
        public void Creates_command() {
            var command = new ChargeCommand(12.5m);
        }
    }
}
"#;

fn billing_solution(root: &Path) -> PathBuf {
    write_solution(
        root,
        &[
            (
                "Billing.Application",
                "Billing.Application/Billing.Application.csproj",
            ),
            ("Billing.Tests", "Billing.Tests/Billing.Tests.csproj"),
        ],
    )
}

fn run_analysis(sln: &Path) -> deadreq::model::AnalysisOutcome {
    let workspace = Workspace::load(sln, LoadOptions::default()).unwrap();
    analyzer::run(&workspace, &IndexResolver, RunOptions { threads: 2 })
}

#[test]
fn handler_only_and_test_only_usage_is_isolated() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let sln = billing_solution(root);
    write_file(root, "Billing.Application/ChargeCommand.cs", CHARGE_COMMAND);
    write_file(root, "Billing.Application/ChargeCommandHandler.cs", CHARGE_HANDLER);
    write_file(root, "Billing.Tests/ChargeCommandTests.cs", CHARGE_TEST);

    let outcome = run_analysis(&sln);
    assert_eq!(outcome.candidates, 1);
    assert_eq!(outcome.isolated.len(), 1);
    let result = &outcome.isolated[0];
    assert_eq!(result.candidate.qualname, "Billing.Application.ChargeCommand");
    assert_eq!(result.verdict, Verdict::Isolated);
    let mut files: Vec<_> = result
        .usage_sites
        .iter()
        .map(|site| site.file_name.as_str())
        .collect();
    files.sort();
    files.dedup();
    assert_eq!(files, vec!["ChargeCommandHandler.cs", "ChargeCommandTests.cs"]);
}

#[test]
fn production_usage_outside_the_handler_is_in_use() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let sln = billing_solution(root);
    write_file(root, "Billing.Application/ChargeCommand.cs", CHARGE_COMMAND);
    write_file(root, "Billing.Application/ChargeCommandHandler.cs", CHARGE_HANDLER);
    write_file(root, "Billing.Tests/ChargeCommandTests.cs", CHARGE_TEST);
    write_file(
        root,
        "Billing.Application/ChargeService.cs",
        r#"
namespace Billing.Application {
    public class ChargeService {
        public object Build() { return new ChargeCommand(3m); }
    }
}
"#,
    );

    let outcome = run_analysis(&sln);
    assert_eq!(outcome.candidates, 1);
    assert!(outcome.isolated.is_empty());
}

#[test]
fn zero_references_is_isolated() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let sln = billing_solution(root);
    write_file(
        root,
        "Billing.Application/OrphanQuery.cs",
        "namespace Billing.Application { public class OrphanQuery {} }",
    );

    let outcome = run_analysis(&sln);
    assert_eq!(outcome.isolated.len(), 1);
    assert_eq!(
        outcome.isolated[0].candidate.qualname,
        "Billing.Application.OrphanQuery"
    );
    assert!(outcome.isolated[0].usage_sites.is_empty());
}

#[test]
fn collection_is_limited_to_suffixed_types_in_application_projects() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let sln = write_solution(
        root,
        &[
            (
                "Billing.Application",
                "Billing.Application/Billing.Application.csproj",
            ),
            (
                "Billing.Infrastructure",
                "Billing.Infrastructure/Billing.Infrastructure.csproj",
            ),
        ],
    );
    write_file(
        root,
        "Billing.Application/Types.cs",
        r#"
namespace Billing.Application {
    public class FooQuery {}
    public class FooQueryHelper {}
}
"#,
    );
    write_file(
        root,
        "Billing.Infrastructure/Types.cs",
        "namespace Billing.Infrastructure { public class FooCommand {} }",
    );

    let workspace = Workspace::load(&sln, LoadOptions::default()).unwrap();
    let (candidates, _) = candidates::collect(&workspace);
    let qualnames: Vec<_> = candidates
        .values()
        .map(|c| c.id.qualname.as_str())
        .collect();
    assert_eq!(qualnames, vec!["Billing.Application.FooQuery"]);
}

struct FailingResolver {
    fail_for: &'static str,
}

impl ReferenceResolver for FailingResolver {
    fn find_references(
        &self,
        workspace: &Workspace,
        candidate: &Candidate,
    ) -> Result<Vec<RefLocation>> {
        if candidate.name == self.fail_for {
            bail!("reference backend unavailable");
        }
        IndexResolver.find_references(workspace, candidate)
    }
}

#[test]
fn resolver_failure_is_isolated_per_candidate() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let sln = billing_solution(root);
    write_file(
        root,
        "Billing.Application/OrphanQuery.cs",
        "namespace Billing.Application { public class OrphanQuery {} }",
    );
    write_file(
        root,
        "Billing.Application/BrokenCommand.cs",
        "namespace Billing.Application { public class BrokenCommand {} }",
    );

    let workspace = Workspace::load(&sln, LoadOptions::default()).unwrap();
    let resolver = FailingResolver {
        fail_for: "BrokenCommand",
    };
    let outcome = analyzer::run(&workspace, &resolver, RunOptions { threads: 2 });

    assert_eq!(outcome.candidates, 2);
    assert_eq!(outcome.isolated.len(), 1);
    assert_eq!(
        outcome.isolated[0].candidate.qualname,
        "Billing.Application.OrphanQuery"
    );
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].qualname, "Billing.Application.BrokenCommand");
    assert!(outcome.failures[0].error.contains("unavailable"));
}

struct BogusResolver;

impl ReferenceResolver for BogusResolver {
    fn find_references(&self, _: &Workspace, _: &Candidate) -> Result<Vec<RefLocation>> {
        Ok(vec![RefLocation {
            document: 9999,
            line: 1,
        }])
    }
}

#[test]
fn unresolvable_locations_are_discarded() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let sln = billing_solution(root);
    write_file(
        root,
        "Billing.Application/OrphanQuery.cs",
        "namespace Billing.Application { public class OrphanQuery {} }",
    );

    let workspace = Workspace::load(&sln, LoadOptions::default()).unwrap();
    let (candidates, _) = candidates::collect(&workspace);
    let candidate = candidates.values().next().unwrap();
    let result = classify_candidate(&workspace, candidate, &BogusResolver).unwrap();
    assert_eq!(result.verdict, Verdict::Isolated);
    assert!(result.usage_sites.is_empty());
}

#[test]
fn ambiguous_handler_document_disqualifies_with_warning() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let sln = billing_solution(root);
    write_file(root, "Billing.Application/ChargeCommand.cs", CHARGE_COMMAND);
    write_file(
        root,
        "Billing.Application/Handlers.cs",
        r#"
namespace Billing.Application {
    public class ChargeCommandHandler : IRequestHandler<ChargeCommand, bool> {}
    public class RefundCommandHandler : IRequestHandler<RefundCommand, bool> {}
}
"#,
    );

    let workspace = Workspace::load(&sln, LoadOptions::default()).unwrap();
    let (candidates, _) = candidates::collect(&workspace);
    let candidate = candidates
        .values()
        .find(|c| c.name == "ChargeCommand")
        .unwrap();
    let result = classify_candidate(&workspace, candidate, &IndexResolver).unwrap();
    assert_eq!(result.verdict, Verdict::InUse);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("2 Handler-suffixed classes"));

    // and the flagged set never contains it
    let outcome = analyzer::run(&workspace, &IndexResolver, RunOptions { threads: 1 });
    assert!(
        outcome
            .isolated
            .iter()
            .all(|r| r.candidate.name != "ChargeCommand")
    );
}
