//! The landing-page intro as a storyboard: overlay, image grid and text timelines, plus
//! the detached stages their steps trigger.

use serde::Serialize;

use crate::animation::ease::Ease;
use crate::animation::value::{ClipPath, Length, Prop, PropValue};
use crate::config::IntroConfig;
use crate::content::hydrate::Hydrated;
use crate::foundation::core::Rgba8;
use crate::foundation::error::LanderResult;
use crate::scene::page::PageRegions;
use crate::scene::tree::NodeId;
use crate::timeline::step::{SetSpec, Target, TweenSpec, node_targets};
use crate::timeline::storyboard::{Action, Stage, Storyboard, Trigger};
use crate::timeline::timeline::Timeline;

/// Name of the custom easing curve shared by the image steps.
pub const HOP: &str = "hop";

/// Timeline and stage names of the intro storyboard.
pub mod stages {
    pub const OVERLAY: &str = "overlay";
    pub const IMAGES: &str = "images";
    pub const TEXT: &str = "text";

    pub const LOGO_LINE_1: &str = "logo-line-1";
    pub const PROJECTS_IN: &str = "projects-in";
    pub const LOCATIONS_IN: &str = "locations-in";
    pub const PROJECTS_COLOR: &str = "projects-color";
    pub const LOCATIONS_COLOR: &str = "locations-color";
    pub const PROJECTS_OUT: &str = "projects-out";
    pub const LOCATIONS_OUT: &str = "locations-out";
    pub const OVERLAY_FADE: &str = "overlay-fade";
    pub const LOGO_LINE_2: &str = "logo-line-2";

    pub const GRID_REVEAL: &str = "grid-reveal";
    pub const GRID_COLLAPSE: &str = "grid-collapse";
    pub const HERO_GROW: &str = "hero-grow";
    pub const BANNER_1_SWING: &str = "banner-1-swing";
    pub const BANNER_2_SWING: &str = "banner-2-swing";
    pub const HERO_SHIFT: &str = "hero-shift";
    pub const IMAGE_ROTATION: &str = "image-rotation";
    pub const LOADER_FADE: &str = "loader-fade";
    pub const HERO_INNER_UNSCALE: &str = "hero-inner-unscale";
    pub const NAV_SLIDE_IN: &str = "nav-slide-in";
    pub const BANNER_POP: &str = "banner-pop";
    pub const PLAY_TEXT: &str = "play-text";
    pub const REVEAL_PANEL_SHOW: &str = "reveal-panel-show";
    pub const REVEAL_PANEL_SLIDE: &str = "reveal-panel-slide";

    pub const TITLE_WORDS: &str = "title-words";
    pub const INTRO_WORDS: &str = "intro-words";
}

/// Word spans produced by splitting the title and intro copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitText {
    pub title: Vec<NodeId>,
    pub intro_copy: Vec<NodeId>,
}

fn nodes(ids: &[NodeId]) -> Vec<Target> {
    ids.iter().copied().map(Target::Node).collect()
}

fn with_header(header: Option<NodeId>, items: &[NodeId]) -> Vec<Target> {
    node_targets(header.into_iter().chain(items.iter().copied()).map(Some))
}

fn pct(v: f64) -> PropValue {
    PropValue::Length(Length::percent(v))
}

fn white() -> PropValue {
    PropValue::Color(Rgba8::rgb(0xff, 0xff, 0xff))
}

fn clip(x0: f64, y0: f64, x1: f64, y1: f64) -> PropValue {
    PropValue::ClipPath(ClipPath::rect(x0, y0, x1, y1))
}

fn list_fade(targets: Vec<Target>, opacity: f64) -> TweenSpec {
    TweenSpec::new(targets)
        .to(Prop::Opacity, PropValue::Number(opacity))
        .duration(0.15)
        .stagger(0.075)
}

fn list_color(targets: Vec<Target>) -> TweenSpec {
    TweenSpec::new(targets)
        .to(Prop::Color, white())
        .duration(0.15)
        .stagger(0.075)
}

fn logo_fill(line: Option<NodeId>) -> TweenSpec {
    TweenSpec::new(node_targets([line]))
        .to(Prop::BackgroundPosition, PropValue::Pair(Length::percent(0.0), Length::percent(0.0)))
        .to(Prop::Color, white())
        .duration(1.0)
        .ease(Ease::Linear)
}

fn banner_swing(banner: Option<NodeId>, left: f64, rotate: f64, hop: &Ease) -> TweenSpec {
    TweenSpec::new(node_targets([banner]))
        .to(Prop::Left, pct(left))
        .to(Prop::Rotate, PropValue::Number(rotate))
        .duration(1.5)
        .ease(hop.clone())
}

fn words_up(words: &[NodeId], delay: f64) -> TweenSpec {
    TweenSpec::new(nodes(words))
        .to(Prop::Y, pct(0.0))
        .duration(1.0)
        .stagger(0.1)
        .delay(delay)
        .ease(Ease::parse("power3.out"))
}

/// Build the intro storyboard against injected page regions.
///
/// Regions missing from the page yield steps with no targets, which keep their timing but
/// change nothing.
#[tracing::instrument(skip_all)]
pub fn intro_storyboard(
    config: &IntroConfig,
    regions: &PageRegions,
    hydrated: &Hydrated,
    words: &SplitText,
) -> LanderResult<Storyboard> {
    use stages as s;

    let hop = Ease::Named(HOP.to_owned());
    let mut sb = Storyboard::new();
    sb.eases.register(HOP, config.hop)?;

    sb.push_initial(SetSpec::new(node_targets([regions.nav])).value(Prop::Y, pct(-125.0)));
    let all_words: Vec<NodeId> = words.intro_copy.iter().chain(&words.title).copied().collect();
    sb.push_initial(SetSpec::new(nodes(&all_words)).value(Prop::Y, pct(100.0)));

    let projects = with_header(regions.projects_header, &hydrated.project_items);
    let locations = with_header(regions.locations_header, &hydrated.location_items);

    sb.push_timeline(
        Timeline::new(s::OVERLAY)
            .to(s::LOGO_LINE_1, logo_fill(regions.logo_lines[0]).delay(0.5))
            .to(s::PROJECTS_IN, list_fade(projects.clone(), 1.0).delay(1.0))
            .with_previous(s::LOCATIONS_IN, list_fade(locations.clone(), 1.0))
            .to(s::PROJECTS_COLOR, list_color(nodes(&hydrated.project_items)))
            .with_previous(s::LOCATIONS_COLOR, list_color(nodes(&hydrated.location_items)))
            .to(s::PROJECTS_OUT, list_fade(projects, 0.0))
            .with_previous(s::LOCATIONS_OUT, list_fade(locations, 0.0))
            .to(
                s::OVERLAY_FADE,
                TweenSpec::new(node_targets([regions.overlay]))
                    .to(Prop::Opacity, PropValue::Number(0.0))
                    .duration(0.5)
                    .delay(1.5),
            ),
    );
    sb.push_stage(Stage::new(
        s::LOGO_LINE_2,
        Action::Tween(logo_fill(regions.logo_lines[1])),
    ));
    sb.push_trigger(Trigger::on_complete(s::LOGO_LINE_1, s::LOGO_LINE_2));

    let grid_step = |targets: Vec<Target>, to: PropValue| {
        TweenSpec::new(targets)
            .to(Prop::ClipPath, to)
            .duration(1.0)
            .delay(2.5)
            .stagger(0.05)
            .ease(hop.clone())
    };
    sb.push_timeline(
        Timeline::new(s::IMAGES)
            .to(
                s::GRID_REVEAL,
                grid_step(nodes(&regions.grid), clip(0.0, 0.0, 100.0, 100.0)),
            )
            .to(
                s::GRID_COLLAPSE,
                grid_step(nodes(&regions.non_hero_grid()), clip(0.0, 0.0, 100.0, 0.0)),
            )
            .to(
                s::HERO_GROW,
                TweenSpec::new(node_targets([regions.hero]))
                    .to(Prop::Scale, PropValue::Number(4.0))
                    .to(Prop::ClipPath, clip(20.0, 10.0, 80.0, 90.0))
                    .duration(1.5)
                    .ease(hop.clone()),
            )
            .with_previous(
                s::BANNER_1_SWING,
                banner_swing(regions.banners.first().copied(), 40.0, -20.0, &hop).delay(0.5),
            )
            .with_previous(
                s::BANNER_2_SWING,
                banner_swing(regions.banners.get(1).copied(), 60.0, 20.0, &hop),
            )
            .to(
                s::HERO_SHIFT,
                TweenSpec::new(node_targets([regions.hero]))
                    .to(Prop::X, PropValue::Length(Length::vw(-15.0)))
                    .duration(1.5)
                    .delay(0.5)
                    .ease(hop.clone()),
            ),
    );

    let rotation_delay = config.rotation.start_delay;
    sb.push_stage(Stage::new(s::IMAGE_ROTATION, Action::StartRotation));
    sb.push_stage(Stage::new(
        s::LOADER_FADE,
        Action::Tween(
            TweenSpec::new(node_targets([regions.loader]))
                .to(Prop::Opacity, PropValue::Number(0.0))
                .duration(0.3),
        ),
    ));
    sb.push_trigger(Trigger::on_start(s::GRID_REVEAL, s::IMAGE_ROTATION).after(rotation_delay));
    sb.push_trigger(Trigger::on_start(s::GRID_REVEAL, s::LOADER_FADE).after(rotation_delay));

    sb.push_stage(Stage::new(
        s::HERO_INNER_UNSCALE,
        Action::Tween(
            TweenSpec::new(node_targets([regions.hero_inner]))
                .to(Prop::Scale, PropValue::Number(1.0))
                .duration(1.5)
                .ease(hop.clone()),
        ),
    ));
    sb.push_stage(Stage::new(
        s::NAV_SLIDE_IN,
        Action::Tween(
            TweenSpec::new(node_targets([regions.nav]))
                .to(Prop::Y, pct(0.0))
                .duration(1.0)
                .delay(0.25)
                .ease(hop.clone()),
        ),
    ));
    sb.push_stage(Stage::new(
        s::BANNER_POP,
        Action::Tween(
            TweenSpec::new(nodes(&regions.banners))
                .to(Prop::Scale, PropValue::Number(1.0))
                .duration(0.5)
                .delay(0.5),
        ),
    ));
    sb.push_stage(Stage::new(s::PLAY_TEXT, Action::PlayTimeline(s::TEXT.to_owned())));
    for target in [s::HERO_INNER_UNSCALE, s::NAV_SLIDE_IN, s::BANNER_POP, s::PLAY_TEXT] {
        sb.push_trigger(Trigger::on_start(s::HERO_GROW, target));
    }

    sb.push_stage(Stage::new(
        s::REVEAL_PANEL_SHOW,
        Action::Set(
            SetSpec::new(node_targets([regions.reveal_panel]))
                .value(Prop::Opacity, PropValue::Number(1.0)),
        ),
    ));
    sb.push_stage(Stage::new(
        s::REVEAL_PANEL_SLIDE,
        Action::Tween(
            TweenSpec::new(node_targets([regions.reveal_panel_text]))
                .to(Prop::X, pct(35.0))
                .duration(1.5)
                .ease(hop),
        ),
    ));
    sb.push_trigger(Trigger::on_start(s::HERO_SHIFT, s::REVEAL_PANEL_SHOW));
    sb.push_trigger(Trigger::on_start(s::HERO_SHIFT, s::REVEAL_PANEL_SLIDE));

    sb.push_timeline(
        Timeline::new(s::TEXT)
            .triggered()
            .to(s::TITLE_WORDS, words_up(&words.title, 1.5))
            .with_previous(s::INTRO_WORDS, words_up(&words.intro_copy, 0.25)),
    );

    sb.validate()?;
    Ok(sb)
}

#[cfg(test)]
#[path = "../tests/unit/intro.rs"]
mod tests;
