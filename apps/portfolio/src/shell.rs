//! Page shell: lays out the content, wires every element to its entrance
//! animation and owns the scroll, motion and reveal components.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use anyhow::Context;
use page_core::{
    download::spawn_asset_download, spawn_frame_driver, AnimationSpec, FrameDriver, MotionClock,
    NavBarStyle, ProceduralMotionLoop, RevealStarted, RevealTrigger, ScrollPhaseTracker,
    ScrollSignal, Timing, ViewportRevealController,
};
use shared::{
    content::PageContent,
    domain::{ElementId, ObjectTransform, Rect, StyleDelta, StyleProperty},
    error::AnimationSpecError,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::Settings;

const NAV_HEIGHT: f64 = 72.0;
const SECTION_PADDING: f64 = 80.0;
const HEADING_HEIGHT: f64 = 140.0;
const STAGGER: f32 = 0.1;
const CHIP_STAGGER: f32 = 0.05;

fn fade_y(from_y: f32, timing: Timing) -> Result<AnimationSpec, AnimationSpecError> {
    AnimationSpec::new(
        StyleDelta::new()
            .with(StyleProperty::Opacity, 0.0)
            .with(StyleProperty::TranslateY, from_y),
        StyleDelta::new()
            .with(StyleProperty::Opacity, 1.0)
            .with(StyleProperty::TranslateY, 0.0),
        timing,
    )
}

fn slide_x(from_x: f32, timing: Timing) -> Result<AnimationSpec, AnimationSpecError> {
    AnimationSpec::new(
        StyleDelta::new()
            .with(StyleProperty::Opacity, 0.0)
            .with(StyleProperty::TranslateX, from_x),
        StyleDelta::new()
            .with(StyleProperty::Opacity, 1.0)
            .with(StyleProperty::TranslateX, 0.0),
        timing,
    )
}

fn pop(from_scale: f32, timing: Timing) -> Result<AnimationSpec, AnimationSpecError> {
    AnimationSpec::new(
        StyleDelta::new()
            .with(StyleProperty::Opacity, 0.0)
            .with(StyleProperty::Scale, from_scale),
        StyleDelta::new()
            .with(StyleProperty::Opacity, 1.0)
            .with(StyleProperty::Scale, 1.0),
        timing,
    )
}

fn drop_in(from_y: f32, timing: Timing) -> Result<AnimationSpec, AnimationSpecError> {
    AnimationSpec::new(
        StyleDelta::new().with(StyleProperty::TranslateY, from_y),
        StyleDelta::new().with(StyleProperty::TranslateY, 0.0),
        timing,
    )
}

fn stagger(index: usize) -> f32 {
    index as f32 * STAGGER
}

/// Top-to-bottom block allocator.
struct LayoutCursor {
    y: f64,
    width: f64,
}

impl LayoutCursor {
    fn block(&mut self, height: f64) -> Rect {
        let rect = Rect::new(0.0, self.y, self.width, height);
        self.y += height;
        rect
    }

    fn gap(&mut self, height: f64) {
        self.y += height;
    }

    fn grid(&mut self, count: usize, columns: usize, cell_height: f64) -> Vec<Rect> {
        let columns = columns.max(1);
        let cell_width = self.width / columns as f64;
        let rects = (0..count)
            .map(|index| {
                let row = (index / columns) as f64;
                let column = (index % columns) as f64;
                Rect::new(
                    column * cell_width,
                    self.y + row * cell_height,
                    cell_width,
                    cell_height,
                )
            })
            .collect();
        self.y += count.div_ceil(columns) as f64 * cell_height;
        rects
    }
}

/// Splits `parent` into `count` equal horizontal strips.
fn strips(parent: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let height = parent.height / count as f64;
    (0..count)
        .map(|index| Rect::new(parent.x, parent.y + index as f64 * height, parent.width, height))
        .collect()
}

#[derive(Debug, Clone)]
pub struct PlacedElement {
    pub id: ElementId,
    pub label: String,
    pub bounds: Rect,
}

pub struct PageShell {
    viewport: (f64, f64),
    page_height: f64,
    elements: Vec<PlacedElement>,
    /// Section anchors (without `#`) and their top offsets, in page order.
    sections: Vec<(String, f64)>,
    reveal: ViewportRevealController,
    scroll: ScrollSignal,
    scroll_tracker: ScrollPhaseTracker,
    rendered_nav: Arc<Mutex<NavBarStyle>>,
    clock: MotionClock,
    motion: ProceduralMotionLoop,
    assets_dir: PathBuf,
    resume_asset: String,
    next_id: u64,
}

impl PageShell {
    /// Registers every element and runs the initial viewport pass at `t = 0`.
    pub fn mount(content: &PageContent, settings: &Settings) -> anyhow::Result<Self> {
        let scroll = ScrollSignal::new();
        let rendered_nav = Arc::new(Mutex::new(NavBarStyle::Transparent));
        let nav_sink = Arc::clone(&rendered_nav);
        let scroll_tracker =
            ScrollPhaseTracker::attach(&scroll, settings.scroll_threshold, move |scrolled| {
                *nav_sink.lock().unwrap_or_else(PoisonError::into_inner) =
                    NavBarStyle::for_phase(scrolled);
            });

        let clock = MotionClock::new();
        let mut motion = ProceduralMotionLoop::new(content.hero_scene.clone());
        motion.start(&clock);

        let mut shell = Self {
            viewport: (settings.viewport_width, settings.viewport_height),
            page_height: 0.0,
            elements: Vec::new(),
            sections: Vec::new(),
            reveal: ViewportRevealController::new(),
            scroll,
            scroll_tracker,
            rendered_nav,
            clock,
            motion,
            assets_dir: settings.assets_dir.clone(),
            resume_asset: content.resume_asset.clone(),
            next_id: 0,
        };
        shell
            .place_content(content)
            .context("failed to build reveal animations")?;

        let initial = shell.observe_viewport(0.0, Duration::ZERO);
        info!(
            elements = shell.elements.len(),
            revealed = initial.len(),
            "page mounted"
        );
        Ok(shell)
    }

    fn place(
        &mut self,
        label: impl Into<String>,
        bounds: Rect,
        spec: AnimationSpec,
        trigger: RevealTrigger,
    ) {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.reveal.register(id, spec, trigger, Duration::ZERO);
        self.elements.push(PlacedElement {
            id,
            label: label.into(),
            bounds,
        });
    }

    fn section(&mut self, anchor: &str, top: f64) {
        self.sections.push((anchor.to_string(), top));
    }

    fn place_content(&mut self, content: &PageContent) -> Result<(), AnimationSpecError> {
        let (width, height) = self.viewport;
        let mut cursor = LayoutCursor { y: 0.0, width };

        // Navigation bar and hero animate on load.
        let nav = Rect::new(0.0, 0.0, width, NAV_HEIGHT);
        self.place("nav", nav, drop_in(-100.0, Timing::new(0.3))?, RevealTrigger::OnMount);
        let nav_cells = strips(
            Rect::new(width / 3.0, 0.0, width / 3.0, NAV_HEIGHT),
            content.nav_links.len(),
        );
        for (index, (link, bounds)) in content.nav_links.iter().zip(nav_cells).enumerate() {
            self.place(
                format!("nav:{}", link.label),
                bounds,
                fade_y(-20.0, Timing::new(0.3).delay(stagger(index)))?,
                RevealTrigger::OnMount,
            );
        }

        self.section("home", cursor.y);
        let hero = cursor.block(height);
        self.place("hero", hero, fade_y(30.0, Timing::new(0.8))?, RevealTrigger::OnMount);
        for (index, (line, bounds)) in content
            .hero_lines
            .iter()
            .zip(strips(hero, content.hero_lines.len()))
            .enumerate()
        {
            self.place(
                format!("hero:{line}"),
                bounds,
                fade_y(30.0, Timing::new(0.8).delay(0.2 * (index as f32 + 1.0)))?,
                RevealTrigger::OnMount,
            );
        }

        // About.
        self.section("about", cursor.y);
        cursor.gap(SECTION_PADDING);
        let intro = cursor.block(HEADING_HEIGHT * 2.0);
        self.place("about:intro", intro, slide_x(-30.0, Timing::new(0.8))?, RevealTrigger::InView);
        for (index, (service, bounds)) in content
            .services
            .iter()
            .zip(cursor.grid(content.services.len(), 2, 48.0))
            .enumerate()
        {
            self.place(
                format!("about:{service}"),
                bounds,
                slide_x(-20.0, Timing::new(0.5).delay(stagger(index)))?,
                RevealTrigger::InView,
            );
        }

        // Skills.
        self.section("skills", cursor.y);
        cursor.gap(SECTION_PADDING);
        let heading = cursor.block(HEADING_HEIGHT);
        self.place("skills:heading", heading, fade_y(30.0, Timing::new(0.8))?, RevealTrigger::InView);
        let cards = cursor.grid(content.skills.len(), 3, 320.0);
        for (card_index, (category, card)) in content.skills.iter().zip(cards).enumerate() {
            self.place(
                format!("skills:{}", category.title),
                card,
                fade_y(30.0, Timing::new(0.6).delay(stagger(card_index)))?,
                RevealTrigger::InView,
            );
            for (chip_index, (skill, chip)) in category
                .skills
                .iter()
                .zip(strips(card, category.skills.len()))
                .enumerate()
            {
                let delay = stagger(card_index) + chip_index as f32 * CHIP_STAGGER;
                self.place(
                    format!("skills:{}:{skill}", category.title),
                    chip,
                    slide_x(-20.0, Timing::new(0.4).delay(delay))?,
                    RevealTrigger::InView,
                );
            }
        }
        let stats_row = cursor.grid(content.stats.len(), 4, 120.0);
        if let (Some(first), Some(last)) = (stats_row.first(), stats_row.last()) {
            let band = Rect::new(0.0, first.y, width, last.bottom() - first.y);
            self.place(
                "skills:stats",
                band,
                fade_y(30.0, Timing::new(0.8).delay(0.4))?,
                RevealTrigger::InView,
            );
        }
        for (index, (stat, bounds)) in content.stats.iter().zip(stats_row).enumerate() {
            self.place(
                format!("skills:stat:{}", stat.label),
                bounds,
                pop(0.5, Timing::new(0.6).delay(stagger(index)))?,
                RevealTrigger::InView,
            );
        }

        // Projects.
        self.section("projects", cursor.y);
        cursor.gap(SECTION_PADDING);
        let heading = cursor.block(HEADING_HEIGHT);
        self.place("projects:heading", heading, fade_y(30.0, Timing::new(0.8))?, RevealTrigger::InView);
        let cards = cursor.grid(content.projects.len(), 3, 480.0);
        for (index, (project, card)) in content.projects.iter().zip(cards).enumerate() {
            self.place(
                format!("projects:{}", project.title),
                card,
                fade_y(30.0, Timing::new(0.6).delay(stagger(index)))?,
                RevealTrigger::InView,
            );
        }

        // Contact.
        self.section("contact", cursor.y);
        cursor.gap(SECTION_PADDING);
        let heading = cursor.block(HEADING_HEIGHT);
        self.place("contact:heading", heading, fade_y(30.0, Timing::new(0.8))?, RevealTrigger::InView);
        let columns = cursor.grid(2, 2, 640.0);
        self.place(
            "contact:form",
            columns[0],
            slide_x(-30.0, Timing::new(0.8))?,
            RevealTrigger::InView,
        );
        self.place(
            "contact:info",
            columns[1],
            slide_x(30.0, Timing::new(0.8).delay(0.2))?,
            RevealTrigger::InView,
        );
        for (index, (detail, bounds)) in content
            .contact_details
            .iter()
            .zip(strips(columns[1], content.contact_details.len()))
            .enumerate()
        {
            self.place(
                format!("contact:{}", detail.title),
                bounds,
                fade_y(20.0, Timing::new(0.5).delay(stagger(index)))?,
                RevealTrigger::InView,
            );
        }
        cursor.gap(SECTION_PADDING);

        self.page_height = cursor.y;
        Ok(())
    }

    /// Largest scroll offset that still keeps the viewport on the page.
    pub fn max_scroll(&self) -> f64 {
        (self.page_height - self.viewport.1).max(0.0)
    }

    /// Scrolls to `offset` (clamped to the page) and runs the viewport pass.
    pub fn scroll_to(&mut self, offset: f64, now: Duration) -> Vec<RevealStarted> {
        let offset = offset.clamp(0.0, self.max_scroll());
        self.scroll.emit(offset);
        self.observe_viewport(offset, now)
    }

    /// Top offset of the section named by `anchor` (`#contact` or `contact`).
    pub fn section_top(&self, anchor: &str) -> Option<f64> {
        let anchor = anchor.trim_start_matches('#');
        self.sections
            .iter()
            .find(|(name, _)| name == anchor)
            .map(|(_, top)| *top)
    }

    /// Scrolls the section named by `anchor` to the top of the viewport, as a
    /// nav link or in-page button does. Unknown anchors leave the page alone.
    pub fn scroll_to_anchor(
        &mut self,
        anchor: &str,
        now: Duration,
    ) -> Option<Vec<RevealStarted>> {
        let top = self.section_top(anchor)?;
        debug!(%anchor, top, "scrolling to section");
        Some(self.scroll_to(top, now))
    }

    fn observe_viewport(&mut self, offset: f64, now: Duration) -> Vec<RevealStarted> {
        let viewport = Rect::new(0.0, offset, self.viewport.0, self.viewport.1);
        let started = self.reveal.observe_viewport(
            viewport,
            self.elements.iter().map(|element| (element.id, &element.bounds)),
            now,
        );
        for reveal in &started {
            debug!(
                element = %self.label(reveal.element).unwrap_or("?"),
                delay = reveal.delay,
                "element revealed"
            );
        }
        started
    }

    /// Delivers one frame tick to the hero motion.
    pub fn advance(&self, now: Duration) {
        self.clock.advance_to(now);
    }

    pub fn start_frame_driver(&self, frame_interval: Duration) -> FrameDriver {
        spawn_frame_driver(self.clock.clone(), frame_interval)
    }

    pub fn download_resume(&self, dest_dir: PathBuf) -> JoinHandle<()> {
        spawn_asset_download(self.assets_dir.clone(), self.resume_asset.clone(), dest_dir)
    }

    pub fn nav_style(&self) -> NavBarStyle {
        *self.rendered_nav.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn scrolled(&self) -> bool {
        self.scroll_tracker.scrolled()
    }

    pub fn hero_frame(&self) -> Vec<ObjectTransform> {
        self.motion.current_frame()
    }

    pub fn elements(&self) -> &[PlacedElement] {
        &self.elements
    }

    pub fn label(&self, id: ElementId) -> Option<&str> {
        self.elements
            .iter()
            .find(|element| element.id == id)
            .map(|element| element.label.as_str())
    }

    pub fn reveal(&self) -> &ViewportRevealController {
        &self.reveal
    }

    pub fn clock(&self) -> &MotionClock {
        &self.clock
    }

    pub fn scroll_signal(&self) -> &ScrollSignal {
        &self.scroll
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Releases the scroll subscription, stops the motion loop and discards
    /// every reveal entry.
    pub fn teardown(&mut self) {
        self.scroll_tracker.detach();
        self.motion.stop();
        for element in self.elements.drain(..) {
            self.reveal.unmount(element.id);
        }
        info!("page torn down");
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
