//! End-to-end tests from template files on disk to a finished signal
//!
//! Flow: fixture templates -> file-backed source -> ancestry -> signal.

use pretty_assertions::assert_eq;
use scripter_core::{
    EngineConfig, Error, FixedHost, Originator, Relationship, Resolution, SignalResolver,
    SignalStep,
};
use scripter_fs::NormalizedPath;
use scripter_test_utils::TestTemplates;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Path to the test-fixtures directory (relative to the workspace root).
fn fixtures_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> ../../test-fixtures
    manifest_dir.join("../../test-fixtures")
}

fn templates() -> TestTemplates {
    TestTemplates::from_fixtures(fixtures_dir().join("templates"))
}

fn resolver(templates: &TestTemplates) -> SignalResolver {
    SignalResolver::new(templates.source()).with_host(FixedHost::new("linux"))
}

#[test]
fn web_service_resolves_against_its_base() {
    let templates = templates();
    let originator = Originator::from_args("flows/deploy.yaml", "deploy", "1");

    let signal = resolver(&templates)
        .resolve("web-service.yaml", Some(&originator))
        .unwrap();

    assert_eq!(signal.sender, "web-service");
    assert_eq!(signal.host_os, "linux");
    assert_eq!(signal.labels, vec!["linux", "service", "web"]);

    // Configuration is open, so the child wins.
    assert_eq!(signal.execution_mode.as_deref(), Some("async"));
    assert_eq!(signal.environment.as_deref(), Some("prod"));
    assert!(signal.containerize);
    assert!(!signal.bypass_security);
    assert_eq!(signal.executor.as_deref(), Some("build-farm"));
    assert_eq!(signal.authorization_hub.as_deref(), Some("hubs/rbac.yaml"));
    assert_eq!(signal.executor_user.as_deref(), Some("svc-runner"));

    // Action is sealed by the base.
    assert_eq!(signal.action_type.as_deref(), Some("script"));
    assert_eq!(signal.executable_path.as_deref(), Some("/opt/scripter/bin/runner"));
    assert_eq!(signal.signal_os.as_deref(), Some("linux"));
    assert_eq!(signal.package_installer.as_deref(), Some("apt"));
    assert_eq!(signal.installation_dependencies, vec!["curl"]);

    // The prod context replaces dependencies, inputs and variables.
    assert_eq!(signal.context_selection, Resolution::Resolved(1));
    assert_eq!(
        signal.execution_dependencies,
        vec!["deps/postgres-prod.yaml", "deps/redis.yaml"]
    );
    assert_eq!(signal.arguments, vec!["--workers", "8"]);
    let expected_variables: BTreeMap<String, String> = [
        ("LOG_LEVEL".to_string(), "warn".to_string()),
        ("REGION".to_string(), "eu-west-1".to_string()),
    ]
    .into();
    assert_eq!(signal.environment_variables, expected_variables);

    assert_eq!(
        signal.steps,
        vec![
            SignalStep::new("build", "steps/build.yaml", "base-service"),
            SignalStep::new("test", "steps/test.yaml", "base-service"),
        ]
    );

    let quays: Vec<_> = signal
        .emit_quays
        .iter()
        .map(|q| (q.name.as_str(), q.relationship, q.priority))
        .collect();
    assert_eq!(
        quays,
        vec![
            ("postgres-prod", Relationship::Dependency, 0),
            ("redis", Relationship::Dependency, 1),
            ("build", Relationship::Step, 0),
            ("test", Relationship::Step, 1),
        ]
    );

    let originator = signal.originator_quay.unwrap();
    assert_eq!(originator.name, "deploy");
    assert_eq!(originator.process_name, "deploy");
    assert!(originator.require_acknowledge);
}

#[test]
fn default_environment_returns_before_contexts_and_steps() {
    let templates = templates();

    let signal = resolver(&templates)
        .resolve("web-service-local.yaml", None)
        .unwrap();

    assert_eq!(signal.sender, "web-service-local");
    assert_eq!(signal.environment.as_deref(), Some("default"));
    assert_eq!(signal.execution_dependencies, vec!["deps/postgres.yaml"]);
    assert_eq!(signal.arguments, vec!["--config", "/etc/runner.toml"]);
    assert!(signal.steps.is_empty());
    assert!(signal.emit_quays.is_empty());
    assert_eq!(signal.context_selection, Resolution::Unresolved);
}

#[test]
fn engine_config_from_fixture_changes_the_sentinel() {
    let templates = templates();
    let config = EngineConfig::load(&NormalizedPath::new(fixtures_dir().join("engine.toml")))
        .unwrap();
    assert_eq!(config.max_ancestry_depth, 4);
    assert_eq!(config.parent_separator, "=>");

    let signal = resolver(&templates)
        .with_config(config)
        .resolve("web-service-local.yaml", None)
        .unwrap();

    // "default" is now an ordinary name that matches no context.
    assert_eq!(signal.context_selection, Resolution::FellBackToDefault(0));
    assert_eq!(signal.execution_dependencies, vec!["deps/postgres-dev.yaml"]);
    assert_eq!(signal.steps.len(), 2);
}

#[test]
fn depth_limit_is_enforced() {
    let templates = templates();
    let config = EngineConfig {
        max_ancestry_depth: 2,
        ..EngineConfig::default()
    };

    let err = resolver(&templates)
        .with_config(config)
        .resolve("web-service-local.yaml", None)
        .unwrap_err();

    assert!(matches!(err, Error::AncestryTooDeep { max_depth: 2, .. }));
}

#[test]
fn missing_ancestor_file_is_fatal() {
    let templates = templates();

    let err = resolver(&templates).resolve("orphan.yaml", None).unwrap_err();

    assert!(matches!(
        err,
        Error::Meta(scripter_meta::Error::DefinitionNotFound { .. })
    ));
}

#[test]
fn signal_serializes_for_the_dispatcher() {
    let templates = templates();
    let signal = resolver(&templates).resolve("web-service.yaml", None).unwrap();

    let json = serde_json::to_value(&signal).unwrap();

    assert_eq!(json["sender"], "web-service");
    assert_eq!(json["context_selection"]["outcome"], "resolved");
    assert_eq!(json["context_selection"]["value"], 1);
    assert_eq!(json["emit_quays"][0]["relationship"], "dependency");
    assert_eq!(json["emit_quays"][2]["relationship"], "step");
    assert!(json["originator_quay"].is_null());

    let round_trip: scripter_core::Signal = serde_json::from_value(json).unwrap();
    assert_eq!(round_trip, signal);
}

#[test]
fn templates_written_at_runtime_join_the_fixtures() {
    let templates = templates();
    templates.write(
        "nightly.yaml",
        "header:\n  name: nightly\n  inherits: web-service.yaml => web-service\n  labels: [nightly]\n\
         steps:\n  can-overwrite: false\n  list:\n    - { step: report, pointer: steps/report.yaml }\n",
    );
    templates.assert_file_contains("nightly.yaml", "web-service.yaml => web-service");

    let signal = resolver(&templates).resolve("nightly.yaml", None).unwrap();

    let steps: Vec<_> = signal.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(steps, vec!["build", "test", "report"]);
    assert_eq!(signal.labels, vec!["linux", "service", "web", "nightly"]);
}
