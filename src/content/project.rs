use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{LanderError, LanderResult};

/// One showcased project. Missing fields render as empty text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRecord {
    pub name: String,
    pub director: String,
    pub location: String,
}

impl ProjectRecord {
    pub fn new(
        name: impl Into<String>,
        director: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            director: director.into(),
            location: location.into(),
        }
    }
}

/// Parse a JSON array of project records.
pub fn projects_from_reader<R: std::io::Read>(r: R) -> LanderResult<Vec<ProjectRecord>> {
    serde_json::from_reader(r)
        .map_err(|e| LanderError::validation(format!("parse projects JSON: {e}")))
}

/// Load a JSON array of project records from disk.
pub fn load_projects(path: impl AsRef<Path>) -> LanderResult<Vec<ProjectRecord>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        LanderError::validation(format!("open projects JSON '{}': {e}", path.display()))
    })?;
    projects_from_reader(BufReader::new(f))
}

#[cfg(test)]
#[path = "../../tests/unit/content/project.rs"]
mod tests;
