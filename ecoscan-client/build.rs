//! Stamps the ecoscan binary with its git revision, build time and cargo
//! profile (`GIT_HASH`, `BUILD_TIMESTAMP`, `BUILD_PROFILE`), which `main`
//! logs at startup.

use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

/// Short revision of the checkout being built, if it is a git checkout
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let revision = String::from_utf8(output.stdout).ok()?;
    let revision = revision.trim();
    (!revision.is_empty()).then(|| revision.to_string())
}

fn stamp(name: &str, value: &str) {
    println!("cargo:rustc-env={}={}", name, value);
}

fn main() {
    stamp(
        "GIT_HASH",
        &git_revision().unwrap_or_else(|| UNKNOWN.to_string()),
    );

    // Local time with offset, e.g. 2025-10-26T14:30:45-05:00
    stamp(
        "BUILD_TIMESTAMP",
        &chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
    );

    stamp(
        "BUILD_PROFILE",
        &env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()),
    );
}
