//! Full run integration tests.
//!
//! Tests complete verification runs: every check executes exactly once,
//! failures never stop the run, and the exit code follows the failed list.

use crate::mocks::*;
use deploy_preflight::checks::CheckId;
use deploy_preflight::engine::orchestrator::{CheckOrchestrator, OrchestratorConfig, RegisteredCheck};
use deploy_preflight::{run_verification, CheckResult, Severity};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

const ALL_IDS: [&str; 7] = [
    "environment",
    "permissions",
    "database",
    "static_files",
    "services",
    "application",
    "logs",
];

fn status(report: &deploy_preflight::Report, id: &str) -> CheckResult {
    report
        .find(id)
        .and_then(|c| c.result.clone())
        .unwrap_or_else(|| panic!("check {} did not run", id))
}

#[test]
fn test_healthy_deployment_passes() {
    let tree = AppTree::healthy();
    let clock = VirtualClock::default();
    let runner = MockRunner::healthy_host();
    let ctx = context(tree.config(), runner.clone(), healthy_http(clock.clone()), clock.clone());

    let report = run_verification(ctx, None, false);

    let ids: Vec<&str> = report.checks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ALL_IDS);
    for id in ALL_IDS {
        assert!(
            matches!(status(&report, id), CheckResult::Pass { .. }),
            "{}: {:?}",
            id,
            status(&report, id)
        );
    }
    assert!(report.failed_checks().is_empty());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.summary().passed, 7);

    // gunicorn, celery, nginx
    assert_eq!(runner.count("systemctl is-active"), 3);
    assert_eq!(runner.count("manage.py check"), 1);
    assert_eq!(clock.now(), Duration::ZERO);
}

#[test]
fn test_failures_do_not_stop_run() {
    let tree = AppTree::healthy();
    tree.write(".env", "SECRET_KEY=s3cret\n");
    let clock = VirtualClock::default();
    let runner = MockRunner::new()
        .on("manage.py check", failure(1, "django.db.utils.OperationalError: connection refused\n"))
        .on("systemctl is-active", output(0, "active\n"));
    let ctx = context(tree.config(), runner.clone(), healthy_http(clock.clone()), clock);

    let report = run_verification(ctx, None, false);

    assert_eq!(report.checks.len(), 7);
    assert_eq!(report.failed_checks(), vec!["environment", "database"]);
    assert_eq!(report.exit_code(), 1);
    match status(&report, "environment") {
        CheckResult::Fail { message, .. } => {
            assert_eq!(message, "Missing required variables: DATABASE_URL, ENVIRONMENT")
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(runner.count("manage.py check"), 1);
}

#[test]
fn test_warnings_only_exit_zero_unless_strict() {
    let tree = AppTree::healthy();
    tree.write("logs/app.log", "INFO ok\nERROR Internal Server Error: /checkout/\n");

    let run = |strict: bool| {
        let clock = VirtualClock::default();
        let runner = MockRunner::new()
            .on("systemctl is-active celery", output(3, "inactive\n"))
            .on("systemctl is-active", output(0, "active\n"))
            .on("manage.py check", output(0, ""));
        let ctx = context(tree.config(), runner, healthy_http(clock.clone()), clock);
        run_verification(ctx, None, strict)
    };

    let report = run(false);
    assert!(status(&report, "services").is_warn());
    assert!(status(&report, "logs").is_warn());
    assert!(report.failed_checks().is_empty());
    assert_eq!(report.warned_checks(), vec!["services", "logs"]);
    assert_eq!(report.exit_code(), 0);

    let report = run(true);
    assert_eq!(report.failed_checks(), vec!["services", "logs"]);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_single_database_check_keeps_command_exit_code() {
    let tree = AppTree::healthy();
    for code in [1, 2, 42] {
        let clock = VirtualClock::default();
        let runner = MockRunner::new().on("manage.py check", failure(code, "error\n"));
        let ctx = context(tree.config(), runner.clone(), healthy_http(clock.clone()), clock);

        let report = run_verification(ctx, Some(CheckId::Database), false);

        assert_eq!(report.checks.len(), 1);
        assert_eq!(status(&report, "database").exit_code(false), code);
        assert_eq!(report.exit_code(), code);
        assert_eq!(runner.calls().len(), 1);
    }
}

#[test]
fn test_single_database_check_missing_python() {
    let tree = AppTree::healthy();
    let clock = VirtualClock::default();
    let ctx = context(tree.config(), MockRunner::new(), healthy_http(clock.clone()), clock);

    let report = run_verification(ctx, Some(CheckId::Database), false);
    assert_eq!(status(&report, "database").exit_code(false), 127);
    assert_eq!(report.exit_code(), 127);
}

#[test]
fn test_application_ready_at_ceiling() {
    let tree = AppTree::healthy();
    let clock = VirtualClock::default();
    let http = healthy_http(clock.clone()).endpoint(HEALTH_URL, Endpoint::UpAt(Duration::from_secs(120)));
    let ctx = context(tree.config(), MockRunner::new(), http, clock.clone());

    let report = run_verification(ctx, Some(CheckId::Application), false);

    match status(&report, "application") {
        CheckResult::Pass { message, .. } => {
            assert_eq!(message, "Health check OK after 120s (25 attempts, 3ms)")
        }
        other => panic!("expected pass, got {:?}", other),
    }
    assert_eq!(clock.now(), Duration::from_secs(120));
}

#[test]
fn test_application_not_ready_by_ceiling() {
    let tree = AppTree::healthy();
    for up_at in [Some(121), None] {
        let clock = VirtualClock::default();
        let endpoint = match up_at {
            Some(secs) => Endpoint::UpAt(Duration::from_secs(secs)),
            None => Endpoint::Refused,
        };
        let http = healthy_http(clock.clone()).endpoint(HEALTH_URL, endpoint);
        let ctx = context(tree.config(), MockRunner::new(), http.clone(), clock.clone());

        let report = run_verification(ctx, Some(CheckId::Application), false);

        let result = status(&report, "application");
        assert_eq!(result.exit_code(false), 1, "{:?}", result);
        assert_eq!(http.requests(), 25);
        assert_eq!(clock.now(), Duration::from_secs(120));
    }
}

#[test]
fn test_application_endpoint_problem_is_warning() {
    let tree = AppTree::healthy();
    let clock = VirtualClock::default();
    let http = healthy_http(clock.clone()).endpoint(ADMIN_URL, Endpoint::Status(500));
    let ctx = context(tree.config(), MockRunner::new(), http, clock);

    let report = run_verification(ctx, Some(CheckId::Application), false);

    match status(&report, "application") {
        CheckResult::Warn { details, .. } => {
            assert_eq!(details, "http://localhost/admin/login/ returned HTTP 500")
        }
        other => panic!("expected warning, got {:?}", other),
    }
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_application_redirect_counts_as_up() {
    let tree = AppTree::healthy();
    let clock = VirtualClock::default();
    let http = healthy_http(clock.clone()).endpoint(HOME_URL, Endpoint::Status(302));
    let ctx = context(tree.config(), MockRunner::new(), http, clock);

    let report = run_verification(ctx, Some(CheckId::Application), false);
    assert!(matches!(status(&report, "application"), CheckResult::Pass { .. }));
}

// Orchestrator behavior with synthetic checks

fn counted(id: &str, result: CheckResult, runs: Rc<Cell<u32>>) -> RegisteredCheck {
    RegisteredCheck {
        id: id.to_string(),
        name: id.to_string(),
        severity: Severity::Fatal,
        description: format!("Test check {}", id),
        check_fn: Box::new(move || {
            runs.set(runs.get() + 1);
            result.clone()
        }),
    }
}

#[test]
fn test_each_check_runs_exactly_once() {
    let runs: Vec<Rc<Cell<u32>>> = (0..4).map(|_| Rc::new(Cell::new(0))).collect();
    let mut orchestrator = CheckOrchestrator::new(OrchestratorConfig::default());
    orchestrator.register_check(counted("a", CheckResult::fail("down", "x"), runs[0].clone()));
    orchestrator.register_check(counted("b", CheckResult::pass("ok"), runs[1].clone()));
    orchestrator.register_check(counted("c", CheckResult::warn("meh", "y"), runs[2].clone()));
    orchestrator.register_check(counted("d", CheckResult::fail("down", "z"), runs[3].clone()));

    let report = orchestrator.run_all();

    assert!(runs.iter().all(|r| r.get() == 1));
    assert_eq!(report.failed_checks(), vec!["a", "d"]);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_panicking_check_is_contained() {
    let mut orchestrator = CheckOrchestrator::new(OrchestratorConfig::default());
    orchestrator.register_check(RegisteredCheck {
        id: "boom".to_string(),
        name: "Boom".to_string(),
        severity: Severity::Warning,
        description: "Panics".to_string(),
        check_fn: Box::new(|| panic!("unexpected state")),
    });
    orchestrator.register_check(counted("after", CheckResult::pass("ok"), Rc::new(Cell::new(0))));

    let report = orchestrator.run_all();

    assert!(status(&report, "boom").is_fail());
    assert!(matches!(status(&report, "after"), CheckResult::Pass { .. }));
}
