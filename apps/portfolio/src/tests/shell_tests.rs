use super::{PageShell, PlacedElement};
use crate::config::Settings;

use page_core::NavBarStyle;
use shared::{
    content::PageContent,
    domain::{ObjectId, StyleProperty},
};
use std::{
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn mount() -> PageShell {
    PageShell::mount(&PageContent::default(), &Settings::default()).expect("mount")
}

fn element<'a>(shell: &'a PageShell, label: &str) -> &'a PlacedElement {
    shell
        .elements()
        .iter()
        .find(|element| element.label == label)
        .unwrap_or_else(|| panic!("no element labelled {label}"))
}

fn fired(shell: &PageShell, label: &str) -> bool {
    shell.reveal().is_fired(element(shell, label).id)
}

fn temp_root(tag: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("portfolio_shell_{tag}_{suffix}"))
}

#[test]
fn navigation_and_hero_reveal_on_mount() {
    let shell = mount();
    assert!(fired(&shell, "nav"));
    assert!(fired(&shell, "nav:Home"));
    assert!(fired(&shell, "hero"));
    assert!(!fired(&shell, "about:intro"));
    assert!(!fired(&shell, "contact:form"));
}

#[test]
fn hero_lines_are_staggered() {
    let shell = mount();
    let delays: Vec<f32> = shell
        .elements()
        .iter()
        .filter(|element| element.label.starts_with("hero:"))
        .map(|element| {
            shell
                .reveal()
                .entry(element.id)
                .expect("registered")
                .spec
                .delay()
        })
        .collect();
    assert_eq!(delays.len(), 4);
    for (index, delay) in delays.iter().enumerate() {
        assert!((delay - 0.2 * (index as f32 + 1.0)).abs() < 1e-6);
    }
}

#[test]
fn scrolling_reveals_sections_once() {
    let mut shell = mount();

    let started = shell.scroll_to(200.0, Duration::from_millis(500));
    assert!(!started.is_empty());
    assert!(fired(&shell, "about:intro"));
    assert!(!fired(&shell, "projects:heading"));

    let intro = element(&shell, "about:intro").id;
    let fired_at = shell.reveal().entry(intro).and_then(|e| e.fired_at());
    assert_eq!(fired_at, Some(Duration::from_millis(500)));

    shell.scroll_to(0.0, Duration::from_millis(900));
    let again = shell.scroll_to(200.0, Duration::from_millis(1_300));
    assert!(again.iter().all(|started| started.element != intro));
    assert_eq!(
        shell.reveal().entry(intro).and_then(|e| e.fired_at()),
        Some(Duration::from_millis(500))
    );

    shell.scroll_to(f64::MAX, Duration::from_secs(2));
    assert!(fired(&shell, "contact:form"));
    assert!(fired(&shell, "contact:info"));
}

#[test]
fn revealed_element_reaches_target_style() {
    let mut shell = mount();
    shell.scroll_to(200.0, Duration::from_secs(1));
    let intro = element(&shell, "about:intro").id;

    let start = shell
        .reveal()
        .style_at(intro, Duration::from_secs(1))
        .expect("style");
    assert_eq!(start.get(StyleProperty::Opacity), Some(0.0));
    assert_eq!(start.get(StyleProperty::TranslateX), Some(-30.0));

    let end = shell
        .reveal()
        .style_at(intro, Duration::from_secs(3))
        .expect("style");
    assert_eq!(end.get(StyleProperty::Opacity), Some(1.0));
    assert_eq!(end.get(StyleProperty::TranslateX), Some(0.0));
}

#[test]
fn nav_style_follows_scroll_threshold() {
    let mut shell = mount();
    assert_eq!(shell.nav_style(), NavBarStyle::Transparent);

    shell.scroll_to(50.0, Duration::ZERO);
    assert_eq!(shell.nav_style(), NavBarStyle::Transparent);
    assert!(!shell.scrolled());

    shell.scroll_to(51.0, Duration::ZERO);
    assert_eq!(shell.nav_style(), NavBarStyle::Elevated);

    shell.scroll_to(0.0, Duration::ZERO);
    assert_eq!(shell.nav_style(), NavBarStyle::Transparent);
}

#[test]
fn scroll_offset_is_clamped_to_page() {
    let mut shell = mount();
    shell.scroll_to(-40.0, Duration::ZERO);
    assert_eq!(shell.scroll_signal().offset(), 0.0);

    shell.scroll_to(1e9, Duration::ZERO);
    assert_eq!(shell.scroll_signal().offset(), shell.max_scroll());
    assert!(shell.max_scroll() < shell.page_height());
}

#[test]
fn hero_objects_follow_the_clock() {
    let shell = mount();
    let initial = shell.hero_frame();
    assert_eq!(initial.len(), 2);

    shell.advance(Duration::from_secs(1));
    let frame = shell.hero_frame();
    let cube = frame
        .iter()
        .find(|transform| transform.id == ObjectId(1))
        .expect("cube");
    assert!((cube.position.y - 0.5 * 1.0_f32.sin()).abs() < 1e-4);
    assert!((cube.rotation.x - 0.3).abs() < 1e-4);
}

#[test]
fn teardown_releases_every_subscription() {
    let mut shell = mount();
    assert_eq!(shell.clock().subscriber_count(), 1);
    assert_eq!(shell.scroll_signal().listener_count(), 1);

    shell.teardown();
    assert_eq!(shell.clock().subscriber_count(), 0);
    assert_eq!(shell.scroll_signal().listener_count(), 0);
    assert!(shell.reveal().is_empty());

    let frozen = shell.hero_frame();
    shell.advance(Duration::from_secs(5));
    assert_eq!(shell.hero_frame(), frozen);
}

#[tokio::test(start_paused = true)]
async fn frame_driver_advances_page_time() {
    let shell = mount();
    let driver = shell.start_frame_driver(Duration::from_millis(16));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(shell.clock().now() > Duration::ZERO);

    driver.stop();
}

#[tokio::test]
async fn resume_download_copies_into_destination() {
    let root = temp_root("resume");
    let assets = root.join("public");
    fs::create_dir_all(&assets).expect("assets dir");
    fs::write(assets.join("resume.pdf"), b"%PDF-1.4").expect("write resume");

    let settings = Settings {
        assets_dir: assets,
        ..Settings::default()
    };
    let shell = PageShell::mount(&PageContent::default(), &settings).expect("mount");
    shell
        .download_resume(root.join("downloads"))
        .await
        .expect("download task");

    assert!(root.join("downloads").join("resume.pdf").exists());
    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn every_nav_link_resolves_to_a_section() {
    let shell = mount();
    let content = PageContent::default();
    let mut previous = -1.0;
    for link in &content.nav_links {
        let top = shell
            .section_top(&link.anchor)
            .unwrap_or_else(|| panic!("no section for {}", link.anchor));
        assert!(top > previous, "{} is out of page order", link.anchor);
        previous = top;
    }
    assert_eq!(shell.section_top("#home"), Some(0.0));
    assert_eq!(shell.section_top("contact"), shell.section_top("#contact"));
}

#[test]
fn anchor_navigation_reveals_the_target_section() {
    let mut shell = mount();
    let top = shell.section_top("#contact").expect("contact section");

    let started = shell
        .scroll_to_anchor("#contact", Duration::from_secs(1))
        .expect("known anchor");
    let form = element(&shell, "contact:form").id;
    assert!(started.iter().any(|reveal| reveal.element == form));
    assert!(fired(&shell, "contact:heading"));
    assert!(!fired(&shell, "about:intro"));
    assert_eq!(shell.scroll_signal().offset(), top.min(shell.max_scroll()));
    assert_eq!(shell.nav_style(), NavBarStyle::Elevated);

    shell.scroll_to_anchor("home", Duration::from_secs(2));
    assert_eq!(shell.scroll_signal().offset(), 0.0);
    assert_eq!(shell.nav_style(), NavBarStyle::Transparent);
}

#[test]
fn unknown_anchor_leaves_the_page_alone() {
    let mut shell = mount();
    shell.scroll_to(300.0, Duration::ZERO);

    assert!(shell
        .scroll_to_anchor("#blog", Duration::from_secs(1))
        .is_none());
    assert_eq!(shell.scroll_signal().offset(), 300.0);
}

#[test]
fn fixed_nav_is_not_refired_by_scrolling() {
    let mut shell = mount();
    let nav = element(&shell, "nav").id;

    let started = shell.scroll_to(0.0, Duration::from_secs(3));
    assert!(started.iter().all(|reveal| reveal.element != nav));
    assert_eq!(
        shell.reveal().entry(nav).and_then(|e| e.fired_at()),
        Some(Duration::ZERO)
    );
}
