use crate::model::ProjectLabel;

/// Labels a project from its name: Test when the name contains "Tests"
/// (case-insensitive) and does not end with "Testing.Common"; otherwise
/// Production. Shared testing utility projects stay Production on purpose.
pub fn classify(project_name: &str) -> ProjectLabel {
    let lower = project_name.to_ascii_lowercase();
    if lower.contains("tests") && !lower.ends_with("testing.common") {
        ProjectLabel::Test
    } else {
        ProjectLabel::Production
    }
}

/// Only the application layer is audited for orphaned request types.
pub fn is_application_project(project_name: &str) -> bool {
    project_name.to_ascii_lowercase().ends_with("application")
}
