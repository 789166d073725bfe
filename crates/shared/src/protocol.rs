use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{PageId, SolutionId};

/// Abstract reference to an element of the host markup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Target {
    Page(PageId),
    NavLink(PageId),
    NavMenu,
    NavToggle,
    Navbar,
    ProblemCard(SolutionId),
    SolutionPanel(SolutionId),
    RoadmapContainer,
    RoadmapStep(usize),
    Gallery,
    ImageFrame,
    ProductImage,
    ProductTitle,
    ProductDesc,
    ProductButton(usize),
    ConstructionSection,
    ConstructionItem(usize),
    ConstructionHeader(usize),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Page(id) => write!(f, "page#{id}"),
            Target::NavLink(id) => write!(f, "nav-link[{id}]"),
            Target::NavMenu => f.write_str("nav-menu"),
            Target::NavToggle => f.write_str("nav-toggle"),
            Target::Navbar => f.write_str("navbar"),
            Target::ProblemCard(id) => write!(f, "problem-card[{id}]"),
            Target::SolutionPanel(id) => write!(f, "solution-content[{id}]"),
            Target::RoadmapContainer => f.write_str("roadmap-container"),
            Target::RoadmapStep(i) => write!(f, "roadmap-step[{i}]"),
            Target::Gallery => f.write_str("product-gallery"),
            Target::ImageFrame => f.write_str("image-frame"),
            Target::ProductImage => f.write_str("product-image"),
            Target::ProductTitle => f.write_str("product-title"),
            Target::ProductDesc => f.write_str("product-desc"),
            Target::ProductButton(i) => write!(f, "product-btn[{i}]"),
            Target::ConstructionSection => f.write_str("construction-section"),
            Target::ConstructionItem(i) => write!(f, "construction-item[{i}]"),
            Target::ConstructionHeader(i) => write!(f, "construction-header[{i}]"),
        }
    }
}

/// Regions watched for their first viewport intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Roadmap,
    Gallery,
    Construction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Digit(u8),
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            other => match other.as_bytes() {
                [digit @ b'0'..=b'9'] => Key::Digit(digit - b'0'),
                _ => Key::Other,
            },
        }
    }

    pub fn is_activation(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Continuation resumed when a scheduled delay (or transition end) elapses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Timer {
    HomeScrollRecheck,
    LoadScrollReset,
    SolutionHide { generation: u64 },
    SolutionReveal { generation: u64 },
    StepPressRelease { index: usize },
    CarouselSwap,
    CarouselSettle,
    AutoplayTick,
    AutoplayResume,
    GalleryEntrance,
}

/// Every event the driver forwards into the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UiInput {
    /// Window `load` finished.
    Loaded,
    NavClick {
        page: PageId,
    },
    PopState {
        fragment: Option<String>,
    },
    NavToggleClick,
    DocumentClick {
        inside_nav: bool,
    },
    Resize {
        width: f64,
    },
    Scroll {
        top: f64,
    },
    Key {
        key: Key,
    },
    ProblemCardClick {
        solution: SolutionId,
    },
    StepClick {
        index: usize,
    },
    StepEnter {
        index: usize,
    },
    StepLeave {
        index: usize,
    },
    ProductButtonClick {
        index: usize,
    },
    ProductButtonKey {
        index: usize,
        key: Key,
    },
    GalleryPointerEnter,
    GalleryPointerLeave,
    TouchStart {
        x: f64,
    },
    TouchEnd {
        x: f64,
    },
    VisibilityChange {
        hidden: bool,
    },
    Intersected {
        section: Section,
    },
    HeaderClick {
        index: usize,
    },
    HeaderKey {
        index: usize,
        key: Key,
    },
    Timer {
        timer: Timer,
    },
}

impl UiInput {
    pub fn name(&self) -> &'static str {
        match self {
            UiInput::Loaded => "loaded",
            UiInput::NavClick { .. } => "nav_click",
            UiInput::PopState { .. } => "pop_state",
            UiInput::NavToggleClick => "nav_toggle_click",
            UiInput::DocumentClick { .. } => "document_click",
            UiInput::Resize { .. } => "resize",
            UiInput::Scroll { .. } => "scroll",
            UiInput::Key { .. } => "key",
            UiInput::ProblemCardClick { .. } => "problem_card_click",
            UiInput::StepClick { .. } => "step_click",
            UiInput::StepEnter { .. } => "step_enter",
            UiInput::StepLeave { .. } => "step_leave",
            UiInput::ProductButtonClick { .. } => "product_button_click",
            UiInput::ProductButtonKey { .. } => "product_button_key",
            UiInput::GalleryPointerEnter => "gallery_pointer_enter",
            UiInput::GalleryPointerLeave => "gallery_pointer_leave",
            UiInput::TouchStart { .. } => "touch_start",
            UiInput::TouchEnd { .. } => "touch_end",
            UiInput::VisibilityChange { .. } => "visibility_change",
            UiInput::Intersected { .. } => "intersected",
            UiInput::HeaderClick { .. } => "header_click",
            UiInput::HeaderKey { .. } => "header_key",
            UiInput::Timer { .. } => "timer",
        }
    }
}
