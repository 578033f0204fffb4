use crate::error::{PlanningError, Result};
use crate::frontmatter::Value;
use crate::plan::PlanDocument;
use serde::Serialize;
use std::path::Path;

pub const REQUIRED_FIELDS: &[&str] = &[
    "phase",
    "plan",
    "type",
    "wave",
    "depends_on",
    "files_modified",
    "autonomous",
    "must_haves",
];

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub task_count: usize,
}

/// Validate a plan file. `file` is resolved against `root` when relative and
/// echoed verbatim in the not-found message.
pub fn verify_plan_file(root: &Path, file: &str) -> Result<PlanReport> {
    let path = root.join(file);
    if !path.is_file() {
        return Err(PlanningError::FileNotFound(file.to_string()));
    }
    let text = std::fs::read_to_string(&path)?;
    Ok(check_plan(&PlanDocument::parse(&text)))
}

pub fn check_plan(plan: &PlanDocument) -> PlanReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for field in REQUIRED_FIELDS {
        if !plan.has_field(field) {
            errors.push(format!("Missing required frontmatter field: {field}"));
        }
    }

    if plan.has_field("wave") && plan.wave().is_none_or(|w| w < 1) {
        warnings.push("wave is not a positive integer".to_string());
    }

    if plan.has_field("must_haves") {
        let truths = plan
            .frontmatter
            .as_ref()
            .and_then(|fm| fm.get_path("must_haves.truths"));
        if truths.is_none_or(Value::is_empty) {
            warnings.push("must_haves.truths is empty".to_string());
        }
    }

    for (i, task) in plan.tasks.iter().enumerate() {
        let n = i + 1;
        if is_blank(task.name.as_deref()) {
            errors.push("Task missing <name>".to_string());
        }
        if is_blank(task.action.as_deref()) {
            errors.push(format!("Task {n} missing <action>"));
        }
        match &task.verify {
            Some(verify) if !verify.has_check() => {
                errors.push(format!("Task {n} <verify> has no <automated> or <human> check"));
            }
            Some(_) => {}
            None => warnings.push(format!("Task {n} missing <verify>")),
        }
        if task.done.is_none() {
            warnings.push(format!("Task {n} missing <done>"));
        }
    }

    if plan.wave().is_some_and(|w| w > 1) && plan.depends_on().is_some_and(|d| d.is_empty()) {
        warnings.push("Wave > 1 but depends_on is empty".to_string());
    }

    if plan.has_checkpoint() && !plan.autonomous_is_false() {
        errors.push("Contains checkpoint tasks but autonomous is not false".to_string());
    }

    PlanReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        task_count: plan.tasks.len(),
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const AUTO_TASK: &str = "<task type=\"auto\">\n  <name>Task 1: Do something</name>\n  <files>some/file.ts</files>\n  <action>Do the thing</action>\n  <verify><automated>echo ok</automated></verify>\n  <done>Thing is done</done>\n</task>";

    fn plan_text(wave: u32, depends_on: &str, autonomous: &str, tasks: &str) -> String {
        format!(
            "---\nphase: 01-test\nplan: 01\ntype: execute\nwave: {wave}\ndepends_on: {depends_on}\nfiles_modified: [some/file.ts]\nautonomous: {autonomous}\nmust_haves:\n  truths:\n    - \"something is true\"\n---\n\n<tasks>\n{tasks}\n</tasks>\n"
        )
    }

    fn check(text: &str) -> PlanReport {
        check_plan(&PlanDocument::parse(text))
    }

    #[test]
    fn complete_plan_is_valid() {
        let report = check(&plan_text(1, "[]", "true", AUTO_TASK));
        assert!(report.valid, "errors: {:?}", report.errors);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
        assert_eq!(report.task_count, 1);
    }

    #[test]
    fn one_error_per_missing_field() {
        let report = check("# No frontmatter here\n\nJust a plan without YAML.\n");
        assert!(!report.valid);
        assert_eq!(report.errors.len(), REQUIRED_FIELDS.len());
        for field in REQUIRED_FIELDS {
            assert!(report
                .errors
                .contains(&format!("Missing required frontmatter field: {field}")));
        }
    }

    #[test]
    fn single_missing_field() {
        let text = plan_text(1, "[]", "true", AUTO_TASK).replace("type: execute\n", "");
        let report = check(&text);
        assert_eq!(report.errors, vec!["Missing required frontmatter field: type"]);
    }

    #[test]
    fn task_missing_name_and_action() {
        let tasks = "<task type=\"auto\">\n<verify><automated>x</automated></verify>\n<done>d</done>\n</task>\n<task type=\"auto\">\n<name>   </name>\n<action>a</action>\n<verify><automated>x</automated></verify>\n<done>d</done>\n</task>";
        let report = check(&plan_text(1, "[]", "true", tasks));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["Task missing <name>", "Task 1 missing <action>", "Task missing <name>"]
        );
    }

    #[test]
    fn empty_verify_is_an_error_even_when_well_formed_otherwise() {
        let task = AUTO_TASK.replace("<automated>echo ok</automated>", "");
        let report = check(&plan_text(1, "[]", "true", &task));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["Task 1 <verify> has no <automated> or <human> check"]
        );
    }

    #[test]
    fn missing_verify_and_done_are_warnings() {
        let task = "<task type=\"auto\">\n<name>n</name>\n<action>a</action>\n</task>";
        let report = check(&plan_text(1, "[]", "true", task));
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["Task 1 missing <verify>", "Task 1 missing <done>"]);
    }

    #[test]
    fn wave_above_one_without_dependencies_warns() {
        let report = check(&plan_text(2, "[]", "true", AUTO_TASK));
        assert!(report.valid);
        assert!(report
            .warnings
            .contains(&"Wave > 1 but depends_on is empty".to_string()));

        let report = check(&plan_text(2, "[01-01]", "true", AUTO_TASK));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn checkpoint_requires_autonomous_false() {
        let checkpoint = "<task type=\"checkpoint:human-verify\">\n<name>Task 2: Verify UI</name>\n<action>Check the UI</action>\n<verify><human>Visit the app</human></verify>\n<done>UI verified</done>\n</task>";
        let tasks = format!("{AUTO_TASK}\n{checkpoint}");

        let report = check(&plan_text(1, "[]", "true", &tasks));
        assert!(!report.valid);
        assert!(report
            .errors
            .contains(&"Contains checkpoint tasks but autonomous is not false".to_string()));

        let report = check(&plan_text(1, "[]", "false", &tasks));
        assert!(report.valid, "errors: {:?}", report.errors);
        assert_eq!(report.task_count, 2);
    }

    #[test]
    fn empty_truths_warns() {
        let text = plan_text(1, "[]", "true", AUTO_TASK)
            .replace("must_haves:\n  truths:\n    - \"something is true\"\n", "must_haves:\n  truths: []\n");
        let report = check(&text);
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["must_haves.truths is empty"]);
    }

    #[test]
    fn missing_file_is_structural() {
        let dir = TempDir::new().unwrap();
        let err = verify_plan_file(dir.path(), ".planning/phases/01-test/nonexistent.md").unwrap_err();
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "File not found: .planning/phases/01-test/nonexistent.md"
        );
    }

    #[test]
    fn reads_plan_from_disk() {
        let dir = TempDir::new().unwrap();
        let rel = ".planning/phases/01-test/01-01-PLAN.md";
        std::fs::create_dir_all(dir.path().join(".planning/phases/01-test")).unwrap();
        std::fs::write(dir.path().join(rel), plan_text(1, "[]", "true", AUTO_TASK)).unwrap();
        let report = verify_plan_file(dir.path(), rel).unwrap();
        assert!(report.valid);
    }
}
