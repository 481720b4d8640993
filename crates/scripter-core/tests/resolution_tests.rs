//! End-to-end resolution scenarios over in-memory and on-disk definitions

use pretty_assertions::assert_eq;
use scripter_core::{
    Error, FixedHost, Originator, Relationship, Resolution, SignalResolver, SignalStep,
};
use scripter_meta::{Definition, MemoryDefinitionSource};
use scripter_test_utils::TestTemplates;

fn resolver(source: MemoryDefinitionSource) -> SignalResolver {
    SignalResolver::new(source).with_host(FixedHost::new("linux"))
}

fn parse(yaml: &str) -> Definition {
    serde_yaml::from_str(yaml).unwrap()
}

mod precedence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sealed_root_value_beats_child() {
        let source = MemoryDefinitionSource::new()
            .with(
                "root.yaml",
                parse("header: { name: root }\naction: { type: script, can-overwrite: false }\n"),
            )
            .with(
                "child.yaml",
                parse(
                    "header: { name: child, inherits: root.yaml => root }\naction: { type: binary }\n",
                ),
            );

        let signal = resolver(source).resolve("child.yaml", None).unwrap();

        assert_eq!(signal.action_type.as_deref(), Some("script"));
        assert_eq!(signal.sender, "child");
    }

    #[test]
    fn unsealed_root_value_yields_to_child() {
        let source = MemoryDefinitionSource::new()
            .with(
                "root.yaml",
                parse("header: { name: root }\nconfiguration: { execution-mode: sync }\n"),
            )
            .with(
                "child.yaml",
                parse(
                    "header: { name: child, inherits: root.yaml => root }\nconfiguration: { execution-mode: async }\n",
                ),
            );

        let signal = resolver(source).resolve("child.yaml", None).unwrap();

        assert_eq!(signal.execution_mode.as_deref(), Some("async"));
    }

    #[test]
    fn child_fills_attributes_the_root_left_out() {
        let source = MemoryDefinitionSource::new()
            .with(
                "root.yaml",
                parse("header: { name: root, labels: [linux] }\naction: { api: v1 }\n"),
            )
            .with(
                "child.yaml",
                parse(
                    r#"
header: { name: child, inherits: root.yaml => root, labels: [linux, gpu] }
action:
  name-or-full-path: /opt/tool/run
  environment-variables: ["(LEVEL) debug", "HOME /srv"]
"#,
                ),
            );

        let signal = resolver(source).resolve("child.yaml", None).unwrap();

        assert_eq!(signal.api.as_deref(), Some("v1"));
        assert_eq!(signal.executable_path.as_deref(), Some("/opt/tool/run"));
        assert_eq!(signal.labels, vec!["linux", "gpu"]);
        assert_eq!(signal.environment_variables["LEVEL"], "debug");
        assert_eq!(signal.environment_variables["HOME"], "/srv");
        assert_eq!(signal.host_os, "linux");
    }
}

mod contexts {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONTEXTS: &str = r#"
header: { name: app }
configuration: { context-name: ENV }
environment:
  contexts:
    - context: dev
      dependencies: [x]
    - context: prod
      dependencies: [y]
"#;

    fn with_environment(environment: &str) -> MemoryDefinitionSource {
        MemoryDefinitionSource::new().with("app.yaml", parse(&CONTEXTS.replace("ENV", environment)))
    }

    #[test]
    fn chosen_context_supplies_dependencies() {
        let signal = resolver(with_environment("prod"))
            .resolve("app.yaml", None)
            .unwrap();

        assert_eq!(signal.execution_dependencies, vec!["y"]);
        assert_eq!(signal.context_selection, Resolution::Resolved(1));
    }

    #[test]
    fn unknown_context_falls_back_to_first() {
        let signal = resolver(with_environment("staging"))
            .resolve("app.yaml", None)
            .unwrap();

        assert_eq!(signal.execution_dependencies, vec!["x"]);
        assert_eq!(signal.context_selection, Resolution::FellBackToDefault(0));
    }
}

mod steps {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_steps_surface_through_extensible_child() {
        let source = MemoryDefinitionSource::new()
            .with(
                "root.yaml",
                parse(
                    r#"
header: { name: root }
steps:
  can-overwrite: false
  list:
    - { step: build, pointer: steps/build.yaml }
    - { step: test, pointer: steps/test.yaml }
"#,
                ),
            )
            .with(
                "child.yaml",
                parse(
                    "header: { name: child, inherits: root.yaml => root }\nsteps: { can-overwrite: true, list: [] }\n",
                ),
            );

        let signal = resolver(source).resolve("child.yaml", None).unwrap();

        assert_eq!(
            signal.steps,
            vec![
                SignalStep::new("build", "steps/build.yaml", "root"),
                SignalStep::new("test", "steps/test.yaml", "root"),
            ]
        );
    }

    #[test]
    fn child_without_steps_annotation_keeps_root_steps_sealed() {
        let source = MemoryDefinitionSource::new()
            .with(
                "root.yaml",
                parse(
                    r#"
header: { name: root }
steps:
  can-overwrite: false
  list:
    - { step: build, pointer: b.yaml }
"#,
                ),
            )
            .with(
                "child.yaml",
                parse("header: { name: child, inherits: root.yaml => root }\n"),
            );

        let signal = resolver(source).resolve("child.yaml", None).unwrap();

        assert_eq!(signal.steps, Vec::<SignalStep>::new());
        assert!(signal.emit_quays.is_empty());
    }

    #[test]
    fn emit_quays_list_dependencies_before_steps() {
        let source = MemoryDefinitionSource::new()
            .with(
                "root.yaml",
                parse(
                    r#"
header: { name: root }
action:
  execution-dependencies: [deps/db.yaml, deps/cache.yaml, deps/queue.yaml]
steps:
  can-overwrite: false
  list:
    - { step: build, pointer: steps/build.yaml }
    - { step: test, pointer: steps/test.yaml }
"#,
                ),
            )
            .with(
                "child.yaml",
                parse(
                    "header: { name: child, inherits: root.yaml => root }\nsteps: { can-overwrite: true }\n",
                ),
            );

        let signal = resolver(source).resolve("child.yaml", None).unwrap();
        let dependencies = 3;

        assert_eq!(signal.emit_quays.len(), dependencies + 2);
        for (index, quay) in signal.emit_quays.iter().enumerate() {
            if index < dependencies {
                assert_eq!(quay.relationship, Relationship::Dependency);
                assert_eq!(quay.priority, index);
                assert_eq!(quay.path, signal.execution_dependencies[index]);
            } else {
                assert_eq!(quay.relationship, Relationship::Step);
                assert_eq!(quay.priority, index - dependencies);
            }
        }
        assert_eq!(signal.emit_quays[0].name, "db");
        assert_eq!(signal.emit_quays[3].name, "build");
    }
}

mod failures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_ancestor_aborts_resolution() {
        let source = MemoryDefinitionSource::new().with(
            "child.yaml",
            parse("header: { name: child, inherits: gone.yaml => gone }\n"),
        );

        let err = resolver(source).resolve("child.yaml", None).unwrap_err();
        assert!(matches!(err, Error::Meta(_)));
    }

    #[test]
    fn cyclic_chain_is_reported() {
        let source = MemoryDefinitionSource::new()
            .with("a.yaml", parse("header: { name: a, inherits: b.yaml => b }\n"))
            .with("b.yaml", parse("header: { name: b, inherits: a.yaml => a }\n"));

        let err = resolver(source).resolve("a.yaml", None).unwrap_err();
        match err {
            Error::CyclicInheritance { chain } => {
                assert_eq!(chain, vec!["a.yaml", "b.yaml", "a.yaml"]);
            }
            other => panic!("Expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_reference_treats_definition_as_root() {
        let source = MemoryDefinitionSource::new().with(
            "child.yaml",
            parse("header: { name: child, inherits: root.yaml root }\naction: { api: v3 }\n"),
        );

        let resolver = resolver(source);
        let chain = resolver.ancestry("child.yaml").unwrap();
        assert_eq!(chain.names(), vec!["child"]);
        assert!(chain.links()[0].parent.is_fallback());

        let signal = resolver.resolve_chain(&chain, None);
        assert_eq!(signal.api.as_deref(), Some("v3"));
    }
}

#[test]
fn three_level_chain_resolves_from_disk() {
    let templates = TestTemplates::new();
    templates
        .write(
            "base/root.yaml",
            r#"
header: { name: root, labels: [base] }
configuration:
  containerize: true
  agent-or-label: build-farm
  can-overwrite: false
action:
  name-or-full-path: /usr/bin/runner
  type: $(overridable) script
"#,
        )
        .write(
            "team/middle.yaml",
            r#"
header: { name: middle, inherits: base/root.yaml => root }
configuration: { agent-or-label: laptop }
action: { type: binary, initial-inputs: [--fast] }
"#,
        )
        .write(
            "leaf.yaml",
            r#"
header: { name: leaf, inherits: team/middle.yaml => middle, labels: [base, leaf] }
action: { initial-inputs: [--safe] }
"#,
        );

    let originator = Originator::from_args("flows/nightly.yaml", "nightly", "yes");
    let resolver = SignalResolver::new(templates.source()).with_host(FixedHost::new("windows"));
    let signal = resolver.resolve("leaf.yaml", Some(&originator)).unwrap();

    assert_eq!(signal.sender, "leaf");
    assert!(signal.containerize);
    assert_eq!(signal.executor.as_deref(), Some("build-farm"));
    assert_eq!(signal.action_type.as_deref(), Some("binary"));
    assert_eq!(signal.arguments, vec!["--safe"]);
    assert_eq!(signal.labels, vec!["base", "leaf"]);
    assert_eq!(signal.host_os, "windows");

    let quay = signal.originator_quay.unwrap();
    assert_eq!(quay.name, "nightly");
    assert!(quay.require_acknowledge);
}
