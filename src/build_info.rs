use serde::Serialize;

/// Git state the binary was built from, empty when git was unavailable.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildInfo {
    pub git_describe: &'static str,
    pub git_hash: &'static str,
}

pub const BUILD_INFO: BuildInfo = BuildInfo {
    git_describe: env!("GIT_DESCRIBE"),
    git_hash: env!("GIT_HASH"),
};

pub fn report(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "version": env!("CARGO_PKG_VERSION"),
        "git_describe": BUILD_INFO.git_describe,
        "git_hash": BUILD_INFO.git_hash,
    })
}

pub fn print_report(name: &str) {
    match serde_json::to_string_pretty(&report(name)) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!("failed to render build info: {e}"),
    }
}
