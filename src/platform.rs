//! Host platform and architecture names as reported to the intake service.

use crate::config::AgentConfig;

/// Architecture of the running binary (`x86_64`, `arm64`, ...).
pub fn detect_arch() -> String {
    arch_name(std::env::consts::ARCH)
}

/// Operating system of the running binary (`macOS`, `Linux`, `Windows`, ...).
pub fn detect_platform() -> String {
    platform_name(std::env::consts::OS)
}

/// `<agentName> <agentVersion> (<platform>/<arch>)`
pub fn version_string(config: &AgentConfig) -> String {
    format!(
        "{} {} ({}/{})",
        config.agent_name,
        config.agent_version,
        detect_platform(),
        detect_arch()
    )
}

fn arch_name(arch: &str) -> String {
    match arch {
        "aarch64" => "arm64".to_string(),
        other => other.to_string(),
    }
}

fn platform_name(os: &str) -> String {
    match os {
        "macos" => "macOS".to_string(),
        "ios" => "iOS".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}
