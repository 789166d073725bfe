use std::time::Duration;

use shared::{
    domain::{PageId, ProductCatalog},
    error::{Outcome, SkipReason},
    protocol::{Key, Section, Target, UiInput},
};

use crate::{
    bus::{PageAware, PageChange},
    carousel::{Phase, ProductCarousel},
    config::Timings,
    memory::MemorySurface,
    ObserveOptions, Site, SiteConfig, SiteLayout, Surface,
};

fn operations() -> PageId {
    PageId::from("operations")
}

fn carousel() -> (ProductCarousel, MemorySurface) {
    let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
    let carousel = ProductCarousel::new(
        operations(),
        ProductCatalog::default(),
        4,
        50.0,
        Timings::default(),
        ObserveOptions::new(0.3, 50),
        &mut surface,
    );
    (carousel, surface)
}

fn activate(carousel: &mut ProductCarousel, surface: &mut MemorySurface) {
    let change = PageChange {
        previous: Some(PageId::from("home")),
        current: operations(),
    };
    carousel.on_page_change(&change, surface);
}

fn run(carousel: &mut ProductCarousel, surface: &mut MemorySurface, millis: u64) {
    surface.advance_with(Duration::from_millis(millis), |timer, surface| {
        carousel.on_timer(&timer, surface);
    });
}

fn active_buttons(surface: &MemorySurface) -> Vec<usize> {
    (0..4)
        .filter(|i| surface.has_class(&Target::ProductButton(*i), "active"))
        .collect()
}

#[test]
fn normalizes_out_of_range_indices() {
    let (mut carousel, mut surface) = carousel();
    assert_eq!(carousel.switch_to(-1, &mut surface), Outcome::Applied(3));
    run(&mut carousel, &mut surface, 250);
    assert_eq!(carousel.current(), 3);

    assert_eq!(carousel.switch_to(4, &mut surface), Outcome::Applied(0));
    run(&mut carousel, &mut surface, 250);
    assert_eq!(
        carousel.switch_to(-4, &mut surface),
        Outcome::Skipped(SkipReason::RedundantAction)
    );
    assert_eq!(carousel.switch_to(9, &mut surface), Outcome::Applied(1));
}

#[test]
fn swaps_content_only_while_dimmed() {
    let (mut carousel, mut surface) = carousel();
    let catalog = ProductCatalog::default();
    let product = catalog.get(2).expect("product");

    carousel.switch_to(2, &mut surface);
    assert_eq!(carousel.phase(), Phase::Dimming);
    assert_eq!(active_buttons(&surface), vec![2]);
    assert_eq!(surface.style(&Target::ImageFrame, "opacity"), Some("0.3"));
    assert_eq!(surface.text(&Target::ProductTitle), None);

    run(&mut carousel, &mut surface, 150);
    assert_eq!(carousel.phase(), Phase::Settling);
    assert_eq!(surface.style(&Target::ImageFrame, "opacity"), Some("1"));
    assert_eq!(
        surface.attribute(&Target::ProductImage, "src"),
        Some(product.image.as_str())
    );
    assert_eq!(
        surface.attribute(&Target::ProductImage, "alt"),
        Some(product.title.as_str())
    );
    assert_eq!(
        surface.text(&Target::ProductTitle),
        Some(product.title.as_str())
    );
    assert_eq!(
        surface.text(&Target::ProductDesc),
        Some(product.description.as_str())
    );
    assert_eq!(
        surface.style(&Target::ProductImage, "transform"),
        Some("scale(0.98)")
    );

    run(&mut carousel, &mut surface, 100);
    assert_eq!(carousel.phase(), Phase::Idle);
    assert_eq!(
        surface.style(&Target::ProductImage, "transform"),
        Some("scale(1)")
    );
}

#[test]
fn second_switch_during_transition_is_ignored() {
    let (mut carousel, mut surface) = carousel();
    assert_eq!(carousel.switch_to(1, &mut surface), Outcome::Applied(1));
    assert_eq!(
        carousel.switch_to(3, &mut surface),
        Outcome::Skipped(SkipReason::Busy)
    );
    assert_eq!(carousel.current(), 1);
    assert!(carousel.is_animating());
    assert_eq!(active_buttons(&surface), vec![1]);

    run(&mut carousel, &mut surface, 150);
    assert_eq!(
        carousel.switch_to(3, &mut surface),
        Outcome::Skipped(SkipReason::Busy)
    );
    assert_eq!(surface.text(&Target::ProductTitle), Some("炫彩组件"));

    run(&mut carousel, &mut surface, 100);
    assert_eq!(carousel.switch_to(3, &mut surface), Outcome::Applied(3));
}

#[test]
fn buttons_beyond_the_catalog_are_ignored() {
    let layout = SiteLayout {
        product_buttons: 6,
        ..SiteLayout::standard()
    };
    let mut surface = MemorySurface::for_layout(&layout);
    let mut carousel = ProductCarousel::new(
        operations(),
        ProductCatalog::default(),
        6,
        50.0,
        Timings::default(),
        ObserveOptions::new(0.3, 50),
        &mut surface,
    );

    assert_eq!(
        carousel.button_click(5, &mut surface),
        Outcome::Skipped(SkipReason::MissingTarget)
    );
    assert!(!carousel.button_key(4, Key::Enter, &mut surface));
    assert_eq!(carousel.current(), 0);
    assert!(!carousel.is_animating());

    assert!(carousel.button_key(2, Key::Enter, &mut surface));
    assert_eq!(carousel.current(), 2);
}

#[test]
fn autoplay_cycles_through_products_without_input() {
    let layout = SiteLayout::standard();
    let mut surface = MemorySurface::for_layout(&layout);
    let mut site =
        Site::mount(&layout, SiteConfig::default(), None, &mut surface).expect("mount");
    site.dispatch(UiInput::NavClick { page: operations() }, &mut surface);

    surface.advance(&mut site, Duration::from_millis(500));
    let carousel = site.carousel().expect("carousel");
    assert!(carousel.is_autoplaying());
    assert_eq!(carousel.current(), 0);

    let mut seen = Vec::new();
    for _ in 0..3 {
        surface.advance(&mut site, Duration::from_millis(3000));
        seen.push(site.carousel().expect("carousel").current());
    }
    assert_eq!(seen, vec![1, 2, 3]);

    surface.advance(&mut site, Duration::from_millis(3000));
    assert_eq!(site.carousel().expect("carousel").current(), 0);
}

#[test]
fn autoplay_has_a_single_live_timer() {
    let (mut carousel, mut surface) = carousel();
    assert_eq!(
        carousel.start_autoplay(&mut surface),
        Outcome::Skipped(SkipReason::PageInactive)
    );
    assert_eq!(
        carousel.stop_autoplay(&mut surface),
        Outcome::Skipped(SkipReason::RedundantAction)
    );

    activate(&mut carousel, &mut surface);
    run(&mut carousel, &mut surface, 500);
    assert!(carousel.is_autoplaying());
    assert_eq!(surface.live_timers(), 1);

    assert_eq!(
        carousel.start_autoplay(&mut surface),
        Outcome::Skipped(SkipReason::RedundantAction)
    );
    assert_eq!(surface.live_timers(), 1);

    assert_eq!(carousel.stop_autoplay(&mut surface), Outcome::Applied(()));
    assert_eq!(surface.live_timers(), 0);
}

#[test]
fn swipe_direction_follows_start_minus_end() {
    let (mut carousel, mut surface) = carousel();
    carousel.switch_to(1, &mut surface);
    run(&mut carousel, &mut surface, 250);

    // delta = 100 - 160 = -60: previous.
    carousel.touch_start(100.0, &mut surface);
    assert_eq!(carousel.touch_end(160.0, &mut surface), Outcome::Applied(0));
    run(&mut carousel, &mut surface, 250);

    assert_eq!(
        carousel.swipe(30.0, &mut surface),
        Outcome::Skipped(SkipReason::BelowThreshold)
    );
    assert_eq!(
        carousel.swipe(-50.0, &mut surface),
        Outcome::Skipped(SkipReason::BelowThreshold)
    );

    carousel.touch_start(200.0, &mut surface);
    assert_eq!(carousel.touch_end(120.0, &mut surface), Outcome::Applied(1));
}

#[test]
fn touch_pauses_autoplay_and_resumes_after_grace() {
    let (mut carousel, mut surface) = carousel();
    activate(&mut carousel, &mut surface);
    run(&mut carousel, &mut surface, 500);
    assert!(carousel.is_autoplaying());

    carousel.touch_start(50.0, &mut surface);
    assert!(!carousel.is_autoplaying());
    carousel.touch_end(55.0, &mut surface);

    run(&mut carousel, &mut surface, 1999);
    assert!(!carousel.is_autoplaying());
    run(&mut carousel, &mut surface, 1);
    assert!(carousel.is_autoplaying());
}

#[test]
fn pointer_hover_pauses_and_reentry_cancels_resume() {
    let (mut carousel, mut surface) = carousel();
    activate(&mut carousel, &mut surface);
    run(&mut carousel, &mut surface, 500);

    carousel.pointer_enter(&mut surface);
    assert!(!carousel.is_autoplaying());
    carousel.pointer_leave(&mut surface);
    run(&mut carousel, &mut surface, 200);
    carousel.pointer_enter(&mut surface);
    run(&mut carousel, &mut surface, 400);
    assert!(!carousel.is_autoplaying());

    carousel.pointer_leave(&mut surface);
    run(&mut carousel, &mut surface, 500);
    assert!(carousel.is_autoplaying());
}

#[test]
fn hidden_document_stops_autoplay_until_visible() {
    let (mut carousel, mut surface) = carousel();
    activate(&mut carousel, &mut surface);
    run(&mut carousel, &mut surface, 500);

    carousel.visibility_changed(true, &mut surface);
    assert!(!carousel.is_autoplaying());
    run(&mut carousel, &mut surface, 10_000);
    assert!(!carousel.is_autoplaying());
    assert_eq!(carousel.current(), 0);

    carousel.visibility_changed(false, &mut surface);
    run(&mut carousel, &mut surface, 500);
    assert!(carousel.is_autoplaying());
}

#[test]
fn leaving_the_page_stops_autoplay() {
    let layout = SiteLayout::standard();
    let mut surface = MemorySurface::for_layout(&layout);
    let mut site =
        Site::mount(&layout, SiteConfig::default(), None, &mut surface).expect("mount");
    site.dispatch(UiInput::NavClick { page: operations() }, &mut surface);
    surface.advance(&mut site, Duration::from_millis(600));
    assert!(site.carousel().expect("carousel").is_autoplaying());

    site.dispatch(
        UiInput::NavClick {
            page: PageId::from("about"),
        },
        &mut surface,
    );
    assert!(!site.carousel().expect("carousel").is_autoplaying());

    site.dispatch(UiInput::GalleryPointerLeave, &mut surface);
    surface.advance(&mut site, Duration::from_millis(5000));
    assert!(!site.carousel().expect("carousel").is_autoplaying());
}

#[test]
fn keyboard_only_while_owning_page_is_active() {
    let layout = SiteLayout::standard();
    let mut surface = MemorySurface::for_layout(&layout);
    let mut site =
        Site::mount(&layout, SiteConfig::default(), None, &mut surface).expect("mount");

    let dispatch = site.dispatch(UiInput::Key { key: Key::Digit(3) }, &mut surface);
    assert!(!dispatch.prevent_default);
    assert_eq!(site.carousel().expect("carousel").current(), 0);

    site.dispatch(UiInput::NavClick { page: operations() }, &mut surface);
    let dispatch = site.dispatch(UiInput::Key { key: Key::Digit(3) }, &mut surface);
    assert!(dispatch.prevent_default);
    assert_eq!(site.carousel().expect("carousel").current(), 2);

    surface.advance(&mut site, Duration::from_millis(250));
    site.dispatch(UiInput::Key { key: Key::ArrowLeft }, &mut surface);
    assert_eq!(site.carousel().expect("carousel").current(), 1);

    surface.advance(&mut site, Duration::from_millis(250));
    let dispatch = site.dispatch(UiInput::Key { key: Key::Digit(9) }, &mut surface);
    assert!(!dispatch.prevent_default);
    site.dispatch(UiInput::Key { key: Key::ArrowRight }, &mut surface);
    assert_eq!(site.carousel().expect("carousel").current(), 2);
}

#[test]
fn button_activation_keys_switch_products() {
    let (mut carousel, mut surface) = carousel();
    assert!(!carousel.button_key(2, Key::ArrowUp, &mut surface));
    assert!(carousel.button_key(2, Key::Enter, &mut surface));
    assert_eq!(carousel.current(), 2);
    run(&mut carousel, &mut surface, 250);
    assert!(carousel.button_key(0, Key::Space, &mut surface));
    assert_eq!(carousel.current(), 0);
}

#[test]
fn gallery_entrance_runs_once_then_starts_autoplay() {
    let (mut carousel, mut surface) = carousel();
    activate(&mut carousel, &mut surface);
    assert!(surface.is_observing(Section::Gallery));

    assert_eq!(carousel.intersected(&mut surface), Outcome::Applied(()));
    assert!(!surface.is_observing(Section::Gallery));
    assert_eq!(
        carousel.intersected(&mut surface),
        Outcome::Skipped(SkipReason::RedundantAction)
    );

    run(&mut carousel, &mut surface, 200);
    for i in 0..4 {
        let button = Target::ProductButton(i);
        assert!(surface.has_class(&button, "animate-in"));
        let delay = format!("{}ms", i * 100);
        assert_eq!(surface.style(&button, "animation-delay"), Some(delay.as_str()));
    }

    assert!(!carousel.is_autoplaying());
    run(&mut carousel, &mut surface, 300);
    assert!(carousel.is_autoplaying());

    // Entrance resume lands at 1200ms on an already running autoplay.
    run(&mut carousel, &mut surface, 1000);
    assert_eq!(surface.live_timers(), 1);
}

#[test]
fn gallery_entrance_off_page_does_not_start_autoplay() {
    let (mut carousel, mut surface) = carousel();
    carousel.intersected(&mut surface);
    run(&mut carousel, &mut surface, 5000);
    assert!(surface.has_class(&Target::ProductButton(3), "animate-in"));
    assert!(!carousel.is_autoplaying());
}
