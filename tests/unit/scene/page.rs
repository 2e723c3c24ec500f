use super::*;

#[test]
fn standard_page_satisfies_contract() {
    let tree = standard_page(&PageLayout::default()).unwrap();
    let regions = PageRegions::locate(&tree).unwrap();

    assert!(regions.nav.is_some());
    assert!(regions.overlay.is_some());
    assert!(regions.logo_lines.iter().all(Option::is_some));
    assert!(regions.projects.is_some() && regions.locations.is_some());
    assert_eq!(regions.grid.len(), 9);
    assert_eq!(regions.hero_slot(), Some(4));
    assert_eq!(regions.non_hero_grid().len(), 8);
    assert!(regions.grid_inner.iter().all(Option::is_some));
    assert_eq!(regions.grid_inner[4], regions.hero_inner);
    assert_eq!(regions.banners.len(), 2);
    assert!(regions.title.is_some() && regions.intro_copy.is_some());
    assert!(regions.reveal_panel.is_some() && regions.reveal_panel_text.is_some());
}

#[test]
fn stylesheet_sets_pre_intro_state() {
    let tree = standard_page(&PageLayout::default()).unwrap();
    let regions = PageRegions::locate(&tree).unwrap();

    let header = regions.projects_header.unwrap();
    assert_eq!(tree.computed(header, Prop::Opacity), PropValue::Number(0.0));

    let slot = regions.grid[0];
    let PropValue::ClipPath(clip) = tree.computed(slot, Prop::ClipPath) else {
        panic!("expected clip path");
    };
    assert_eq!(clip.coverage(), 0.0);

    let panel = regions.reveal_panel.unwrap();
    assert_eq!(tree.computed(panel, Prop::Opacity), PropValue::Number(0.0));
}

#[test]
fn missing_regions_locate_as_none() {
    let tree = SceneTree::new();
    let regions = PageRegions::locate(&tree).unwrap();
    assert_eq!(regions, PageRegions::default());
    assert_eq!(regions.hero_slot(), None);
}

#[test]
fn layout_validation() {
    let bad = PageLayout {
        hero_slot: 9,
        ..PageLayout::default()
    };
    assert!(standard_page(&bad).is_err());
    let empty = PageLayout {
        grid_slots: 0,
        ..PageLayout::default()
    };
    assert!(empty.validate().is_err());
}
