//! Environment probe for the host operating system

/// Reports the operating system the signal is resolved on.
pub trait HostProbe: Send + Sync {
    fn operating_system(&self) -> String;
}

/// Probe backed by the compile-time target OS (`linux`, `macos`, `windows`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostProbe for SystemHost {
    fn operating_system(&self) -> String {
        std::env::consts::OS.to_string()
    }
}

/// Probe that always reports the same OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHost(String);

impl FixedHost {
    pub fn new(os: impl Into<String>) -> Self {
        Self(os.into())
    }
}

impl HostProbe for FixedHost {
    fn operating_system(&self) -> String {
        self.0.clone()
    }
}
