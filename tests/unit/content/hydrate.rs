use super::*;
use crate::content::project::projects_from_reader;
use crate::scene::page::{PageLayout, standard_page};

fn page() -> (SceneTree, Hydrator) {
    let tree = standard_page(&PageLayout::default()).unwrap();
    let regions = PageRegions::locate(&tree).unwrap();
    (tree, Hydrator::from_regions(&regions))
}

#[test]
fn single_record_yields_one_entry_each() {
    let (mut tree, h) = page();
    let out = h.hydrate(&mut tree, &[ProjectRecord::new("A", "B", "C")]);

    assert_eq!(out.project_items.len(), 1);
    assert_eq!(out.location_items.len(), 1);
    let p = out.project_items[0];
    let texts: Vec<&str> = tree.children(p).iter().map(|&c| tree.text(c)).collect();
    assert_eq!(texts, vec!["A", "B"]);
    assert_eq!(tree.text_content(out.location_items[0]), "C");
    assert_eq!(tree.query(".project-item").unwrap(), out.project_items);
    assert_eq!(tree.query(".location-item").unwrap(), out.location_items);
}

#[test]
fn entries_follow_input_order() {
    let (mut tree, h) = page();
    let records: Vec<ProjectRecord> = (0..5)
        .map(|i| ProjectRecord::new(format!("P{i}"), format!("D{i}"), format!("L{i}")))
        .collect();
    let out = h.hydrate(&mut tree, &records);

    assert_eq!(out.project_items.len(), 5);
    assert_eq!(out.location_items.len(), 5);
    for (i, (&p, &l)) in out
        .project_items
        .iter()
        .zip(&out.location_items)
        .enumerate()
    {
        assert_eq!(tree.text_content(p), format!("P{i} D{i}"));
        assert_eq!(tree.text_content(l), format!("L{i}"));
    }
}

#[test]
fn project_entries_follow_the_header() {
    let (mut tree, h) = page();
    let out = h.hydrate(&mut tree, &[ProjectRecord::new("A", "B", "C")]);
    let container = tree.query_one(".projects").unwrap().unwrap();
    let children = tree.children(container);
    assert!(tree.has_class(children[0], "projects-header"));
    assert_eq!(children[1], out.project_items[0]);
}

#[test]
fn missing_fields_render_empty() {
    let records = projects_from_reader(r#"[{"name":"Only name"}]"#.as_bytes()).unwrap();
    let (mut tree, h) = page();
    let out = h.hydrate(&mut tree, &records);
    assert_eq!(tree.text_content(out.project_items[0]), "Only name");
    assert_eq!(tree.text_content(out.location_items[0]), "");
}

#[test]
fn missing_containers_are_skipped() {
    let mut tree = SceneTree::new();
    let out = Hydrator::new(None, None).hydrate(&mut tree, &[ProjectRecord::new("A", "B", "C")]);
    assert_eq!(out, Hydrated::default());
    assert_eq!(tree.len(), 1);
}

#[test]
fn calling_twice_duplicates_entries() {
    let (mut tree, h) = page();
    let records = [ProjectRecord::new("A", "B", "C")];
    h.hydrate(&mut tree, &records);
    h.hydrate(&mut tree, &records);
    assert_eq!(tree.query(".project-item").unwrap().len(), 2);
}
