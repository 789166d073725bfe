use std::time::Duration;

use shared::{
    domain::{PageId, SolutionId},
    error::{Outcome, SkipReason},
    protocol::{Key, Section, Target},
};

use crate::{
    accordion::AccordionGroup,
    bus::{PageAware, PageChange},
    memory::{MemorySurface, Mutation},
    roadmap::RoadmapStepper,
    solutions::SolutionSwitcher,
    ObserveOptions, SiteLayout, Surface,
};

fn enter(page: &str) -> PageChange {
    PageChange {
        previous: Some(PageId::from("home")),
        current: PageId::from(page),
    }
}

fn sid(id: &str) -> SolutionId {
    SolutionId::from(id)
}

fn panel(id: &str) -> Target {
    Target::SolutionPanel(sid(id))
}

fn card(id: &str) -> Target {
    Target::ProblemCard(sid(id))
}

mod solutions {
    use super::*;

    fn switcher(surface: MemorySurface) -> (SolutionSwitcher, MemorySurface) {
        let layout = SiteLayout::standard();
        let switcher = SolutionSwitcher::new(
            PageId::from("solutions"),
            layout.solutions,
            Duration::from_millis(300),
            Duration::from_millis(50),
            &surface,
        );
        (switcher, surface)
    }

    fn fresh() -> (SolutionSwitcher, MemorySurface) {
        switcher(MemorySurface::for_layout(&SiteLayout::standard()))
    }

    fn run(switcher: &mut SolutionSwitcher, surface: &mut MemorySurface, millis: u64) {
        surface.advance_with(Duration::from_millis(millis), |timer, surface| {
            switcher.on_timer(&timer, surface);
        });
    }

    fn laid_out(surface: &MemorySurface) -> Vec<Target> {
        surface
            .with_class_named("active")
            .into_iter()
            .filter(|target| matches!(target, Target::SolutionPanel(_)))
            .cloned()
            .collect()
    }

    #[test]
    fn first_selection_lays_out_immediately_then_fades_in() {
        let (mut switcher, mut surface) = fresh();
        let outcome = switcher.select(&sid("stability"), &mut surface);
        assert_eq!(outcome, Outcome::Applied(sid("stability")));

        assert!(surface.has_class(&card("stability"), "active"));
        for other in ["efficiency", "aesthetics", "cost"] {
            assert!(surface.has_class(&card(other), "collapsed"));
            assert!(!surface.has_class(&card(other), "active"));
        }
        assert_eq!(laid_out(&surface), vec![panel("stability")]);
        assert_eq!(surface.style(&panel("stability"), "display"), Some("block"));
        assert_eq!(surface.style(&panel("stability"), "opacity"), None);

        run(&mut switcher, &mut surface, 50);
        assert_eq!(surface.style(&panel("stability"), "opacity"), Some("1"));
        assert_eq!(
            surface.style(&panel("stability"), "transform"),
            Some("translateY(0)")
        );
        assert!(!switcher.is_transitioning());
    }

    #[test]
    fn handoff_hides_outgoing_before_showing_incoming() {
        let (mut switcher, mut surface) = fresh();
        switcher.select(&sid("efficiency"), &mut surface);
        run(&mut switcher, &mut surface, 50);

        switcher.select(&sid("cost"), &mut surface);
        assert!(!surface.has_class(&card("cost"), "collapsed"));
        assert!(surface.has_class(&card("efficiency"), "collapsed"));
        assert_eq!(surface.style(&panel("efficiency"), "opacity"), Some("0"));
        assert_eq!(
            surface.style(&panel("efficiency"), "transform"),
            Some("translateY(20px)")
        );
        assert_eq!(laid_out(&surface), vec![panel("efficiency")]);

        run(&mut switcher, &mut surface, 299);
        assert_eq!(laid_out(&surface), vec![panel("efficiency")]);

        run(&mut switcher, &mut surface, 1);
        assert_eq!(laid_out(&surface), vec![panel("cost")]);
        assert_eq!(surface.style(&panel("efficiency"), "display"), Some("none"));
        assert_eq!(surface.style(&panel("cost"), "display"), Some("block"));
        assert_eq!(switcher.shown(), Some(&sid("cost")));

        run(&mut switcher, &mut surface, 49);
        assert_eq!(surface.style(&panel("cost"), "opacity"), None);
        run(&mut switcher, &mut surface, 1);
        assert_eq!(surface.style(&panel("cost"), "opacity"), Some("1"));
    }

    #[test]
    fn redundant_and_unknown_selections_are_ignored() {
        let (mut switcher, mut surface) = fresh();
        switcher.select(&sid("aesthetics"), &mut surface);
        surface.clear_journal();

        assert_eq!(
            switcher.select(&sid("aesthetics"), &mut surface),
            Outcome::Skipped(SkipReason::RedundantAction)
        );
        assert_eq!(
            switcher.select(&sid("durability"), &mut surface),
            Outcome::Skipped(SkipReason::MissingTarget)
        );
        assert!(surface.journal().is_empty());
        assert_eq!(switcher.selected(), Some(&sid("aesthetics")));
    }

    #[test]
    fn rapid_reselection_never_shows_intermediate_panel() {
        let (mut switcher, mut surface) = fresh();
        switcher.select(&sid("efficiency"), &mut surface);
        run(&mut switcher, &mut surface, 100);
        surface.clear_journal();

        switcher.select(&sid("stability"), &mut surface);
        run(&mut switcher, &mut surface, 100);
        switcher.select(&sid("cost"), &mut surface);
        run(&mut switcher, &mut surface, 1000);

        assert_eq!(laid_out(&surface), vec![panel("cost")]);
        assert_eq!(switcher.shown(), Some(&sid("cost")));
        assert_eq!(switcher.selected(), Some(&sid("cost")));
        let touched_stability = surface.journal().iter().any(|entry| {
            matches!(
                &entry.mutation,
                Mutation::AddClass { target, .. } | Mutation::SetStyle { target, .. }
                    if *target == panel("stability")
            )
        });
        assert!(!touched_stability);
    }

    #[test]
    fn returning_to_the_shown_panel_cancels_the_fade_out() {
        let (mut switcher, mut surface) = fresh();
        switcher.select(&sid("efficiency"), &mut surface);
        run(&mut switcher, &mut surface, 100);

        switcher.select(&sid("stability"), &mut surface);
        run(&mut switcher, &mut surface, 100);
        switcher.select(&sid("efficiency"), &mut surface);
        run(&mut switcher, &mut surface, 1000);

        assert_eq!(laid_out(&surface), vec![panel("efficiency")]);
        assert_eq!(surface.style(&panel("efficiency"), "opacity"), Some("1"));
        assert_eq!(surface.style(&panel("efficiency"), "display"), Some("block"));
    }

    #[test]
    fn arrow_keys_wrap_only_on_owning_page() {
        let (mut switcher, mut surface) = fresh();
        assert!(!switcher.on_key(Key::ArrowDown, &mut surface));

        switcher.on_page_change(&enter("solutions"), &mut surface);
        assert!(switcher.on_key(Key::ArrowUp, &mut surface));
        assert_eq!(switcher.selected(), Some(&sid("cost")));

        assert!(switcher.on_key(Key::ArrowDown, &mut surface));
        assert_eq!(switcher.selected(), Some(&sid("efficiency")));
        assert!(!switcher.on_key(Key::ArrowLeft, &mut surface));
    }

    #[test]
    fn adopts_markup_selection() {
        let layout = SiteLayout::standard();
        let surface = MemorySurface::for_layout(&layout)
            .with_class(card("efficiency"), "active")
            .with_class(panel("efficiency"), "active");
        let (mut switcher, mut surface) = switcher(surface);
        assert_eq!(switcher.selected(), Some(&sid("efficiency")));
        assert_eq!(switcher.shown(), Some(&sid("efficiency")));

        switcher.select(&sid("stability"), &mut surface);
        run(&mut switcher, &mut surface, 350);
        assert_eq!(laid_out(&surface), vec![panel("stability")]);
    }
}

mod roadmap {
    use super::*;

    fn stepper(surface: &mut MemorySurface) -> RoadmapStepper {
        RoadmapStepper::new(
            PageId::from("roadmap"),
            5,
            Duration::from_millis(150),
            Duration::from_millis(100),
            ObserveOptions::new(0.3, 0),
            surface,
        )
    }

    fn highlighted(surface: &MemorySurface) -> Vec<Target> {
        surface
            .with_class_named("step-highlighted")
            .into_iter()
            .cloned()
            .collect()
    }

    #[test]
    fn click_highlights_one_step_with_press_feedback() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let mut stepper = stepper(&mut surface);

        stepper.click(1, &mut surface);
        stepper.click(3, &mut surface);
        assert_eq!(highlighted(&surface), vec![Target::RoadmapStep(3)]);
        assert_eq!(
            surface.style(&Target::RoadmapStep(3), "transform"),
            Some("scale(0.95)")
        );

        surface.advance_with(Duration::from_millis(150), |timer, surface| {
            stepper.on_timer(&timer, surface);
        });
        assert_eq!(surface.style(&Target::RoadmapStep(3), "transform"), None);
        assert_eq!(surface.style(&Target::RoadmapStep(1), "transform"), None);
        assert_eq!(
            stepper.click(7, &mut surface),
            Outcome::Skipped(SkipReason::MissingTarget)
        );
        assert_eq!(stepper.highlighted(), Some(3));
    }

    #[test]
    fn hover_marks_prefix_and_leave_clears_all() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let mut stepper = stepper(&mut surface);

        stepper.hover_enter(2, &mut surface);
        let completed: Vec<Target> = surface
            .with_class_named("step-completed")
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(
            completed,
            vec![
                Target::RoadmapStep(0),
                Target::RoadmapStep(1),
                Target::RoadmapStep(2)
            ]
        );

        stepper.hover_leave(&mut surface);
        assert!(surface.with_class_named("step-completed").is_empty());
    }

    #[test]
    fn entrance_staggers_once() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let mut stepper = stepper(&mut surface);
        assert!(surface.is_observing(Section::Roadmap));

        assert_eq!(stepper.intersected(&mut surface), Outcome::Applied(()));
        assert!(!surface.is_observing(Section::Roadmap));
        for i in 0..5 {
            let step = Target::RoadmapStep(i);
            let delay = format!("{}ms", (i + 1) * 100);
            assert_eq!(surface.style(&step, "animation-delay"), Some(delay.as_str()));
            assert!(surface.has_class(&step, "animate-in"));
        }
        assert!(stepper.has_entered());
        assert_eq!(
            stepper.intersected(&mut surface),
            Outcome::Skipped(SkipReason::RedundantAction)
        );
    }

    #[test]
    fn arrow_keys_cycle_and_scroll_into_view() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let mut stepper = stepper(&mut surface);
        stepper.on_page_change(&enter("roadmap"), &mut surface);

        assert!(stepper.on_key(Key::ArrowLeft, &mut surface));
        assert_eq!(stepper.highlighted(), Some(4));
        assert!(stepper.on_key(Key::ArrowDown, &mut surface));
        assert_eq!(stepper.highlighted(), Some(0));
        assert!(stepper.on_key(Key::ArrowRight, &mut surface));
        assert_eq!(stepper.highlighted(), Some(1));

        let scrolled = surface
            .journal()
            .iter()
            .filter(|entry| matches!(entry.mutation, Mutation::ScrollIntoView { .. }))
            .count();
        assert_eq!(scrolled, 3);
        assert!(!stepper.on_key(Key::Enter, &mut surface));
    }

    #[test]
    fn adopts_markup_highlight() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard())
            .with_class(Target::RoadmapStep(2), "step-highlighted");
        let mut stepper = stepper(&mut surface);
        stepper.on_page_change(&enter("roadmap"), &mut surface);
        stepper.on_key(Key::ArrowRight, &mut surface);
        assert_eq!(stepper.highlighted(), Some(3));
    }
}

mod accordion {
    use super::*;

    fn group(surface: &mut MemorySurface) -> AccordionGroup {
        AccordionGroup::new(
            PageId::from("about"),
            3,
            Duration::from_millis(100),
            ObserveOptions::new(0.2, 50),
            surface,
        )
    }

    fn expanded(surface: &MemorySurface) -> Vec<Target> {
        surface
            .with_class_named("active")
            .into_iter()
            .filter(|target| matches!(target, Target::ConstructionItem(_)))
            .cloned()
            .collect()
    }

    fn aria(surface: &MemorySurface, index: usize) -> Option<&str> {
        surface.attribute(&Target::ConstructionHeader(index), "aria-expanded")
    }

    #[test]
    fn first_item_opens_by_default() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let group = group(&mut surface);

        assert_eq!(group.expanded(), Some(0));
        assert_eq!(expanded(&surface), vec![Target::ConstructionItem(0)]);
        assert_eq!(aria(&surface, 0), Some("true"));
        assert_eq!(aria(&surface, 1), Some("false"));
        assert_eq!(aria(&surface, 2), Some("false"));
        for i in 0..3 {
            let header = Target::ConstructionHeader(i);
            assert_eq!(surface.attribute(&header, "tabindex"), Some("0"));
            assert_eq!(surface.attribute(&header, "role"), Some("button"));
        }
    }

    #[test]
    fn keeps_markup_expansion_and_collapses_extra_items() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard())
            .with_class(Target::ConstructionItem(1), "active")
            .with_class(Target::ConstructionItem(2), "active");
        let group = group(&mut surface);

        assert_eq!(group.expanded(), Some(1));
        assert_eq!(expanded(&surface), vec![Target::ConstructionItem(1)]);
        assert_eq!(aria(&surface, 2), Some("false"));
    }

    #[test]
    fn toggling_keeps_at_most_one_open() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let mut group = group(&mut surface);

        assert_eq!(group.toggle(2, &mut surface), Outcome::Applied(Some(2)));
        assert_eq!(expanded(&surface), vec![Target::ConstructionItem(2)]);
        assert_eq!(aria(&surface, 0), Some("false"));
        assert_eq!(aria(&surface, 2), Some("true"));

        assert_eq!(group.toggle(2, &mut surface), Outcome::Applied(None));
        assert!(expanded(&surface).is_empty());
        assert_eq!(aria(&surface, 2), Some("false"));

        assert_eq!(
            group.toggle(3, &mut surface),
            Outcome::Skipped(SkipReason::MissingTarget)
        );
    }

    #[test]
    fn activation_keys_toggle_headers() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let mut group = group(&mut surface);

        assert!(group.header_key(1, Key::Enter, &mut surface));
        assert_eq!(group.expanded(), Some(1));
        assert!(group.header_key(1, Key::Space, &mut surface));
        assert_eq!(group.expanded(), None);
        assert!(!group.header_key(1, Key::ArrowDown, &mut surface));
    }

    #[test]
    fn arrow_keys_move_focus_without_expanding() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let mut group = group(&mut surface);
        assert!(!group.on_key(Key::ArrowDown, &mut surface));

        group.on_page_change(&enter("about"), &mut surface);
        assert!(group.on_key(Key::ArrowDown, &mut surface));
        assert_eq!(surface.focused(), Some(Target::ConstructionHeader(0)));
        assert!(group.on_key(Key::ArrowUp, &mut surface));
        assert_eq!(surface.focused(), Some(Target::ConstructionHeader(2)));
        assert!(group.on_key(Key::ArrowDown, &mut surface));
        assert_eq!(surface.focused(), Some(Target::ConstructionHeader(0)));

        assert_eq!(group.expanded(), Some(0));
    }

    #[test]
    fn entrance_staggers_from_zero() {
        let mut surface = MemorySurface::for_layout(&SiteLayout::standard());
        let mut group = group(&mut surface);
        assert!(surface.is_observing(Section::Construction));

        group.intersected(&mut surface);
        assert!(!surface.is_observing(Section::Construction));
        for (i, delay) in ["0ms", "100ms", "200ms"].into_iter().enumerate() {
            let item = Target::ConstructionItem(i);
            assert_eq!(surface.style(&item, "animation-delay"), Some(delay));
            assert!(surface.has_class(&item, "animate-in"));
        }
        assert_eq!(
            group.intersected(&mut surface),
            Outcome::Skipped(SkipReason::RedundantAction)
        );
    }
}
