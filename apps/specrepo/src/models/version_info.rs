//! Schema of the `specrepo-version.yml` file a spec repo may carry at its root.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize, Clone)]
/// Tool versions a repository declares compatibility with.
pub struct RepoVersionInfo {
    /// Oldest tool version able to read the repo.
    #[serde(default)]
    pub min: Option<String>,
    /// Newest tool version able to read the repo.
    #[serde(default)]
    pub max: Option<String>,
    /// Latest released tool version known to the repo maintainers.
    #[serde(default)]
    pub last: Option<String>,
}
