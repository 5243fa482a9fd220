//! Build version reporting.

/// Crate version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Branch the binary was built from, or "unknown" outside a git checkout.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Short commit SHA, or "unknown" outside a git checkout.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

fn dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// `{version}+{branch}.{sha}`, with `.dirty` appended for modified trees.
pub fn version_string() -> String {
    let sha = &GIT_SHA[..7.min(GIT_SHA.len())];
    let mut version = format!("{PKG_VERSION}+{GIT_BRANCH}.{sha}");
    if dirty() {
        version.push_str(".dirty");
    }
    version
}
