//! The page contract: which named regions the intro expects, how to find them, and a
//! standard page that satisfies the contract.

use serde::{Deserialize, Serialize};

use crate::animation::value::{ClipPath, Length, Prop, PropValue};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{LanderError, LanderResult};
use crate::scene::tree::{NodeId, SceneTree};

/// Selector contract for each region, resolved by [`PageRegions::locate`].
pub mod selectors {
    pub const NAV: &str = "nav";
    pub const OVERLAY: &str = ".overlay";
    pub const LOGO_LINE_1: &str = ".logo-line-1";
    pub const LOGO_LINE_2: &str = ".logo-line-2";
    pub const PROJECTS_HEADER: &str = ".projects-header";
    pub const PROJECTS: &str = ".projects";
    pub const LOCATIONS_HEADER: &str = ".locations-header";
    pub const LOCATIONS: &str = ".locations";
    pub const GRID_IMAGES: &str = ".img";
    pub const HERO: &str = ".img.hero-img";
    pub const HERO_INNER: &str = ".hero-img img";
    pub const LOADER: &str = ".loader";
    pub const REVEAL_PANEL: &str = ".reveal-panel";
    pub const REVEAL_PANEL_TEXT: &str = ".reveal-panel-text";
    pub const TITLE: &str = ".title h1";
    pub const INTRO_COPY: &str = ".intro-copy h3";
    pub const BANNERS: &str = ".banner-img";
    pub const PROJECT_ITEM: &str = "project-item";
    pub const LOCATION_ITEM: &str = "location-item";
}

/// Handles to every region the intro animates, injected into the components that use them.
///
/// Regions missing from the page are `None` (or empty); animating them is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageRegions {
    pub nav: Option<NodeId>,
    pub overlay: Option<NodeId>,
    pub logo_lines: [Option<NodeId>; 2],
    pub projects_header: Option<NodeId>,
    pub projects: Option<NodeId>,
    pub locations_header: Option<NodeId>,
    pub locations: Option<NodeId>,
    /// Grid slots in document order, hero included.
    pub grid: Vec<NodeId>,
    pub hero: Option<NodeId>,
    /// The `img` inside the hero slot.
    pub hero_inner: Option<NodeId>,
    /// The `img` inside each grid slot, aligned with `grid` (None where a slot has no image).
    pub grid_inner: Vec<Option<NodeId>>,
    pub loader: Option<NodeId>,
    pub reveal_panel: Option<NodeId>,
    pub reveal_panel_text: Option<NodeId>,
    pub title: Option<NodeId>,
    pub intro_copy: Option<NodeId>,
    pub banners: Vec<NodeId>,
}

impl PageRegions {
    /// Resolve the selector contract against `tree`.
    #[tracing::instrument(skip(tree))]
    pub fn locate(tree: &SceneTree) -> LanderResult<Self> {
        use selectors as s;

        let one = |sel: &str| -> LanderResult<Option<NodeId>> {
            let found = tree.query_one(sel)?;
            if found.is_none() {
                tracing::warn!(selector = sel, "page region not found");
            }
            Ok(found)
        };

        let grid = tree.query(s::GRID_IMAGES)?;
        let img = crate::scene::selector::Selector::parse("img")?;
        let grid_inner = grid
            .iter()
            .map(|&slot| tree.select_within(slot, &img).into_iter().next())
            .collect();

        Ok(Self {
            nav: one(s::NAV)?,
            overlay: one(s::OVERLAY)?,
            logo_lines: [one(s::LOGO_LINE_1)?, one(s::LOGO_LINE_2)?],
            projects_header: one(s::PROJECTS_HEADER)?,
            projects: one(s::PROJECTS)?,
            locations_header: one(s::LOCATIONS_HEADER)?,
            locations: one(s::LOCATIONS)?,
            grid,
            hero: one(s::HERO)?,
            hero_inner: one(s::HERO_INNER)?,
            grid_inner,
            loader: one(s::LOADER)?,
            reveal_panel: one(s::REVEAL_PANEL)?,
            reveal_panel_text: one(s::REVEAL_PANEL_TEXT)?,
            title: one(s::TITLE)?,
            intro_copy: one(s::INTRO_COPY)?,
            banners: tree.query(s::BANNERS)?,
        })
    }

    /// Grid slots other than the hero.
    pub fn non_hero_grid(&self) -> Vec<NodeId> {
        self.grid
            .iter()
            .copied()
            .filter(|&n| Some(n) != self.hero)
            .collect()
    }

    /// Position of the hero among the grid slots.
    pub fn hero_slot(&self) -> Option<usize> {
        let hero = self.hero?;
        self.grid.iter().position(|&n| n == hero)
    }
}

/// Shape of the page built by [`standard_page`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub grid_slots: usize,
    pub hero_slot: usize,
    pub logo: [String; 2],
    pub title: String,
    pub intro_copy: String,
    pub reveal_text: String,
    pub banners: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            grid_slots: 9,
            hero_slot: 4,
            logo: ["Nuvora".to_owned(), "Pictures".to_owned()],
            title: "Stories framed in motion".to_owned(),
            intro_copy: "An independent studio crafting films, campaigns and moving images"
                .to_owned(),
            reveal_text: "Selected work 2019 - 2025".to_owned(),
            banners: 2,
        }
    }
}

impl PageLayout {
    pub fn validate(&self) -> LanderResult<()> {
        if self.grid_slots == 0 {
            return Err(LanderError::validation("page grid_slots must be > 0"));
        }
        if self.hero_slot >= self.grid_slots {
            return Err(LanderError::validation(format!(
                "page hero_slot {} is outside the {}-slot grid",
                self.hero_slot, self.grid_slots
            )));
        }
        Ok(())
    }
}

/// Build the standard intro page: markup plus the stylesheet giving every animated element
/// its pre-intro state.
pub fn standard_page(layout: &PageLayout) -> LanderResult<SceneTree> {
    layout.validate()?;

    let mut tree = SceneTree::new();
    let body = tree.root();

    let nav = tree.append_element(body, "nav", &[])?;
    tree.append_text_element(nav, "a", &["nav-logo"], &layout.logo[0])?;

    let overlay = tree.append_element(body, "div", &["overlay"])?;
    let logo = tree.append_element(overlay, "div", &["logo"])?;
    tree.append_text_element(logo, "p", &["logo-line-1"], &layout.logo[0])?;
    tree.append_text_element(logo, "p", &["logo-line-2"], &layout.logo[1])?;

    let projects = tree.append_element(overlay, "div", &["projects"])?;
    let header = tree.append_element(projects, "div", &["projects-header"])?;
    tree.append_text_element(header, "p", &[], "Projects")?;
    tree.append_text_element(header, "p", &[], "Directors")?;

    let locations = tree.append_element(overlay, "div", &["locations"])?;
    let header = tree.append_element(locations, "div", &["locations-header"])?;
    tree.append_text_element(header, "p", &[], "Locations")?;

    let grid = tree.append_element(body, "div", &["image-grid"])?;
    for slot in 0..layout.grid_slots {
        let classes: &[&str] = if slot == layout.hero_slot {
            &["img", "hero-img"]
        } else {
            &["img"]
        };
        let cell = tree.append_element(grid, "div", classes)?;
        tree.append_element(cell, "img", &[])?;
    }

    let loader = tree.append_element(body, "div", &["loader"])?;
    tree.append_text_element(loader, "p", &[], "Loading")?;

    for i in 1..=layout.banners {
        let class = format!("banner-img-{i}");
        let banner = tree.append_element(body, "div", &["banner-img", class.as_str()])?;
        tree.append_element(banner, "img", &[])?;
    }

    let panel = tree.append_element(body, "div", &["reveal-panel"])?;
    tree.append_text_element(panel, "p", &["reveal-panel-text"], &layout.reveal_text)?;

    let header = tree.append_element(body, "header", &[])?;
    let title = tree.append_element(header, "div", &["title"])?;
    tree.append_text_element(title, "h1", &[], &layout.title)?;
    let intro = tree.append_element(header, "div", &["intro-copy"])?;
    tree.append_text_element(intro, "h3", &[], &layout.intro_copy)?;

    let dim = PropValue::Color(Rgba8::rgb(0x4a, 0x4a, 0x4a));
    tree.add_rule(
        ".logo-line-1, .logo-line-2",
        &[
            (
                Prop::BackgroundPosition,
                PropValue::Pair(Length::percent(100.0), Length::percent(0.0)),
            ),
            (Prop::Color, dim.clone()),
        ],
    )?;
    tree.add_rule(
        ".projects-header, .project-item, .locations-header, .location-item",
        &[(Prop::Opacity, PropValue::Number(0.0)), (Prop::Color, dim)],
    )?;
    tree.add_rule(
        ".img",
        &[(
            Prop::ClipPath,
            PropValue::ClipPath(ClipPath::rect(0.0, 100.0, 100.0, 100.0)),
        )],
    )?;
    tree.add_rule(
        ".banner-img",
        &[
            (Prop::Scale, PropValue::Number(0.0)),
            (Prop::Left, PropValue::Length(Length::percent(50.0))),
            (Prop::Rotate, PropValue::Number(0.0)),
        ],
    )?;
    tree.add_rule(".reveal-panel", &[(Prop::Opacity, PropValue::Number(0.0))])?;

    Ok(tree)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/page.rs"]
mod tests;
