use super::*;
use shared::domain::StyleProperty;

fn fade_up(duration: f32, delay: f32) -> AnimationSpec {
    AnimationSpec::new(
        StyleDelta::new()
            .with(StyleProperty::Opacity, 0.0)
            .with(StyleProperty::TranslateY, 30.0),
        StyleDelta::new()
            .with(StyleProperty::Opacity, 1.0)
            .with(StyleProperty::TranslateY, 0.0),
        Timing::new(duration).delay(delay).easing(Easing::Linear),
    )
    .expect("valid animation")
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn spec_rejects_mismatched_property_sets() {
    let err = AnimationSpec::new(
        StyleDelta::new().with(StyleProperty::Opacity, 0.0),
        StyleDelta::new()
            .with(StyleProperty::Opacity, 1.0)
            .with(StyleProperty::Scale, 1.0),
        Timing::new(0.5),
    )
    .expect_err("mismatch");
    assert_eq!(err, AnimationSpecError::PropertyMismatch);
}

#[test]
fn spec_rejects_negative_timing() {
    let style = StyleDelta::new().with(StyleProperty::Opacity, 0.0);
    assert_eq!(
        AnimationSpec::new(style.clone(), style.clone(), Timing::new(-0.1)),
        Err(AnimationSpecError::NegativeDuration(-0.1))
    );
    assert_eq!(
        AnimationSpec::new(style.clone(), style.clone(), Timing::new(0.1).delay(-1.0)),
        Err(AnimationSpecError::NegativeDelay(-1.0))
    );
    assert_eq!(
        AnimationSpec::new(style.clone(), style, Timing::new(f32::NAN)),
        Err(AnimationSpecError::NonFinite)
    );
}

#[test]
fn in_view_entry_fires_once_on_first_intersection() {
    let mut controller = ViewportRevealController::new();
    let element = ElementId(1);
    assert!(controller
        .register(element, fade_up(0.8, 0.0), RevealTrigger::InView, ms(0))
        .is_none());

    assert!(controller.observe(element, false, ms(100)).is_none());
    assert!(!controller.is_fired(element));

    let started = controller
        .observe(element, true, ms(200))
        .expect("first intersection starts the reveal");
    assert_eq!(started.element, element);
    assert_eq!(started.started_at, ms(200));
    assert!(controller.is_fired(element));

    // Leaving and re-entering never re-triggers.
    assert!(controller.observe(element, false, ms(300)).is_none());
    assert!(controller.observe(element, true, ms(400)).is_none());
    assert_eq!(controller.entry(element).and_then(RevealEntry::fired_at), Some(ms(200)));
}

#[test]
fn on_mount_entry_fires_at_registration() {
    let mut controller = ViewportRevealController::new();
    let started = controller
        .register(ElementId(7), fade_up(0.5, 0.1), RevealTrigger::OnMount, ms(40))
        .expect("on-mount fires immediately");
    assert_eq!(started.started_at, ms(40));
    assert!((started.delay - 0.1).abs() < f32::EPSILON);
    assert!(controller.observe(ElementId(7), true, ms(90)).is_none());
}

#[test]
fn re_registering_keeps_fired_state() {
    let mut controller = ViewportRevealController::new();
    let element = ElementId(3);
    controller.register(element, fade_up(0.8, 0.0), RevealTrigger::InView, ms(0));
    controller.observe(element, true, ms(10));

    assert!(controller
        .register(element, fade_up(0.2, 0.0), RevealTrigger::InView, ms(20))
        .is_none());
    assert!(controller.is_fired(element));
    assert_eq!(controller.len(), 1);
}

#[test]
fn unmounted_entry_is_discarded_quietly() {
    let mut controller = ViewportRevealController::new();
    let element = ElementId(9);
    controller.register(element, fade_up(0.8, 0.0), RevealTrigger::InView, ms(0));

    let removed = controller.unmount(element).expect("entry existed");
    assert!(!removed.fired());
    assert!(controller.is_empty());
    assert!(controller.observe(element, true, ms(50)).is_none());
    assert!(controller.unmount(element).is_none());
    assert!(controller.style_at(element, ms(50)).is_none());
}

#[test]
fn style_follows_delay_then_duration() {
    let mut controller = ViewportRevealController::new();
    let element = ElementId(2);
    controller.register(element, fade_up(1.0, 0.5), RevealTrigger::InView, ms(0));

    let before = controller.style_at(element, ms(5_000)).expect("style");
    assert_eq!(before.get(StyleProperty::Opacity), Some(0.0));

    controller.observe(element, true, ms(1_000));
    let delayed = controller.style_at(element, ms(1_400)).expect("style");
    assert_eq!(delayed.get(StyleProperty::Opacity), Some(0.0));

    let halfway = controller.style_at(element, ms(2_000)).expect("style");
    assert!((halfway.get(StyleProperty::Opacity).unwrap_or_default() - 0.5).abs() < 1e-4);
    assert!((halfway.get(StyleProperty::TranslateY).unwrap_or_default() - 15.0).abs() < 1e-3);
    assert!(controller.is_animating(ms(2_000)));

    let done = controller.style_at(element, ms(2_600)).expect("style");
    assert_eq!(done.get(StyleProperty::Opacity), Some(1.0));
    assert_eq!(done.get(StyleProperty::TranslateY), Some(0.0));
    assert!(!controller.is_animating(ms(2_600)));
}

#[test]
fn zero_duration_jumps_to_target_after_delay() {
    let spec = fade_up(0.0, 0.2);
    assert_eq!(spec.style_after(ms(100)).get(StyleProperty::Opacity), Some(0.0));
    assert_eq!(spec.style_after(ms(300)).get(StyleProperty::Opacity), Some(1.0));
}

#[test]
fn viewport_observation_only_starts_visible_elements() {
    let mut controller = ViewportRevealController::new();
    let layout = vec![
        (ElementId(1), Rect::new(0.0, 100.0, 800.0, 200.0)),
        (ElementId(2), Rect::new(0.0, 900.0, 800.0, 200.0)),
    ];
    for (index, (element, _)) in layout.iter().enumerate() {
        controller.register(
            *element,
            fade_up(0.6, index as f32 * 0.1),
            RevealTrigger::InView,
            ms(0),
        );
    }

    let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
    let started = controller.observe_viewport(
        viewport,
        layout.iter().map(|(element, rect)| (*element, rect)),
        ms(16),
    );
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].element, ElementId(1));
    assert_eq!(controller.pending(), 1);

    let scrolled = Rect::new(0.0, 700.0, 800.0, 600.0);
    let started = controller.observe_viewport(
        scrolled,
        layout.iter().map(|(element, rect)| (*element, rect)),
        ms(32),
    );
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].element, ElementId(2));
    assert!((started[0].delay - 0.1).abs() < 1e-6);
    assert_eq!(controller.pending(), 0);
}
