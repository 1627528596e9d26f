//! Host platform identification.

use sysinfo::System;

/// Display name of the operating system this crate was built for.
#[must_use]
pub fn os_name() -> &'static str {
    match std::env::consts::OS {
        "ios" => "iOS",
        "android" => "Android",
        "macos" => "macOS",
        "linux" => "Linux",
        "windows" => "Windows",
        other => other,
    }
}

/// `"<OS name> <OS version>"`, e.g. `"iOS 17.2"`.
///
/// The version is `"unknown"` when the system does not report one.
#[must_use]
pub fn platform_version() -> String {
    let version = System::os_version()
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| "unknown".to_owned());
    format!("{} {version}", os_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_starts_with_os_name() {
        let version = platform_version();
        assert!(version.starts_with(os_name()));
        assert!(version.len() > os_name().len() + 1);
    }
}
