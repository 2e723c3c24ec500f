use serde::Serialize;

use crate::content::project::ProjectRecord;
use crate::scene::page::{PageRegions, selectors};
use crate::scene::tree::{NodeId, SceneTree};

/// Renders project records into the projects and locations containers.
#[derive(Clone, Copy, Debug)]
pub struct Hydrator {
    projects: Option<NodeId>,
    locations: Option<NodeId>,
}

/// Entries created by [`Hydrator::hydrate`], in record order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Hydrated {
    pub project_items: Vec<NodeId>,
    pub location_items: Vec<NodeId>,
}

impl Hydrator {
    pub fn new(projects: Option<NodeId>, locations: Option<NodeId>) -> Self {
        Self {
            projects,
            locations,
        }
    }

    pub fn from_regions(regions: &PageRegions) -> Self {
        Self::new(regions.projects, regions.locations)
    }

    /// Append one project entry (name, director) and one location entry per record, in order.
    ///
    /// Meant to run once per page; a second call appends duplicates. A missing container
    /// skips that half of the work.
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub fn hydrate(&self, tree: &mut SceneTree, records: &[ProjectRecord]) -> Hydrated {
        let mut out = Hydrated::default();

        match self.projects {
            Some(container) => {
                for record in records {
                    match append_project(tree, container, record) {
                        Ok(id) => out.project_items.push(id),
                        Err(e) => tracing::warn!(error = %e, "project entry skipped"),
                    }
                }
            }
            None => tracing::warn!("projects container missing, project entries skipped"),
        }

        match self.locations {
            Some(container) => {
                for record in records {
                    match append_location(tree, container, record) {
                        Ok(id) => out.location_items.push(id),
                        Err(e) => tracing::warn!(error = %e, "location entry skipped"),
                    }
                }
            }
            None => tracing::warn!("locations container missing, location entries skipped"),
        }

        tracing::debug!(
            projects = out.project_items.len(),
            locations = out.location_items.len(),
            "hydrated"
        );
        out
    }
}

fn append_project(
    tree: &mut SceneTree,
    container: NodeId,
    record: &ProjectRecord,
) -> crate::LanderResult<NodeId> {
    let item = tree.append_element(container, "div", &[selectors::PROJECT_ITEM])?;
    tree.append_text_element(item, "p", &[], &record.name)?;
    tree.append_text_element(item, "p", &[], &record.director)?;
    Ok(item)
}

fn append_location(
    tree: &mut SceneTree,
    container: NodeId,
    record: &ProjectRecord,
) -> crate::LanderResult<NodeId> {
    let item = tree.append_element(container, "div", &[selectors::LOCATION_ITEM])?;
    tree.append_text_element(item, "p", &[], &record.location)?;
    Ok(item)
}

#[cfg(test)]
#[path = "../../tests/unit/content/hydrate.rs"]
mod tests;
