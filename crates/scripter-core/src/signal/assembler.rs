//! Signal assembly from resolved properties

use super::{EmitQuay, Originator, OriginatorQuay, Relationship, Signal, SignalStep, quay_name};
use crate::host::HostProbe;
use crate::property::{AttributeName, Label};
use crate::resolver::ResolvedProperties;
use std::collections::HashSet;

/// Builds the [`Signal`] around the resolved properties.
///
/// Assembly happens in two passes: [`assemble`](Self::assemble) stamps the
/// resolved attributes, host, labels and originator; once contexts and steps
/// are settled, [`finish`](Self::finish) records the step plan and derives
/// the emit quays.
pub struct SignalAssembler<'a> {
    host: &'a dyn HostProbe,
}

impl<'a> SignalAssembler<'a> {
    pub fn new(host: &'a dyn HostProbe) -> Self {
        Self { host }
    }

    pub fn assemble(
        &self,
        resolved: &ResolvedProperties,
        labels: &[Label],
        originator: Option<&Originator>,
    ) -> Signal {
        let text = |name| resolved.scalar(name).map(str::to_string);

        Signal {
            sender: resolved.sender().to_string(),
            host_os: self.host.operating_system(),
            labels: distinct_labels(labels),
            containerize: resolved.flag(AttributeName::Containerize),
            executor: text(AttributeName::AgentOrLabel),
            execution_mode: text(AttributeName::ExecutionMode),
            bypass_security: resolved.flag(AttributeName::BypassSecurity),
            authentication_hub: text(AttributeName::AuthenticationHub),
            authorization_hub: text(AttributeName::AuthorizationHub),
            certification_hub: text(AttributeName::CertificationHub),
            environment: text(AttributeName::ContextName),
            executor_os: text(AttributeName::ExecutorOs),
            executor_user: text(AttributeName::ExecutorUser),
            executor_host: text(AttributeName::ExecutorHost),
            executable_path: text(AttributeName::NameOrFullPath),
            action_type: text(AttributeName::ActionType),
            api: text(AttributeName::Api),
            shutdown_signal: text(AttributeName::ShutdownSignal),
            signal_os: text(AttributeName::OsFamily),
            package_installer: text(AttributeName::PackageInstaller),
            installation_dependencies: resolved
                .list(AttributeName::InstallationDependencies)
                .to_vec(),
            execution_dependencies: resolved.list(AttributeName::ExecutionDependencies).to_vec(),
            arguments: resolved.list(AttributeName::InitialInputs).to_vec(),
            environment_variables: resolved
                .dictionary(AttributeName::EnvironmentVariables)
                .cloned()
                .unwrap_or_default(),
            originator_quay: originator.and_then(originator_quay),
            ..Signal::default()
        }
    }

    /// Record the step plan and derive the emit quays.
    pub fn finish(signal: &mut Signal, steps: Vec<SignalStep>) {
        signal.emit_quays = emit_quays(&signal.execution_dependencies, &steps);
        signal.steps = steps;
    }
}

/// One quay per execution dependency, then one per step, each numbered from
/// zero within its own list.
pub fn emit_quays(dependencies: &[String], steps: &[SignalStep]) -> Vec<EmitQuay> {
    let dependency_quays = dependencies
        .iter()
        .enumerate()
        .map(|(priority, path)| EmitQuay::new(path, Relationship::Dependency, priority));
    let step_quays = steps
        .iter()
        .enumerate()
        .map(|(priority, step)| EmitQuay::new(&step.pointer, Relationship::Step, priority));
    dependency_quays.chain(step_quays).collect()
}

/// Order-preserving de-duplication by label value.
pub fn distinct_labels(labels: &[Label]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .filter(|label| seen.insert(label.value.as_str()))
        .map(|label| label.value.clone())
        .collect()
}

fn originator_quay(originator: &Originator) -> Option<OriginatorQuay> {
    if originator.path.trim().is_empty() {
        return None;
    }
    Some(OriginatorQuay {
        name: quay_name(&originator.path),
        path: originator.path.clone(),
        process_name: originator.nickname.clone(),
        require_acknowledge: originator.require_acknowledge,
    })
}
