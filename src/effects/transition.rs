//! Page transition choreography.
//!
//! The home page has two bottom panels. Switching between them plays a
//! GSAP-style timeline that the browser receives as JSON: the header card
//! swings out, the old panel fades, a callback swaps the active panel and
//! background, then the header swings back while the new panel's items
//! stagger in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const HEADER: &str = "#body-home-top";
const ACTIVE_PAGE: &str = ".page.active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageId {
    MainPage,
    Readme,
}

impl PageId {
    pub fn element_id(&self) -> &'static str {
        match self {
            PageId::MainPage => "body-home-bottom-mainpage",
            PageId::Readme => "body-home-bottom-readme",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            PageId::MainPage => "page-background-moon",
            PageId::Readme => "page-background-sun",
        }
    }

    pub fn button_id(&self) -> &'static str {
        match self {
            PageId::MainPage => "button-to-mainpage",
            PageId::Readme => "button-to-readme",
        }
    }

    pub fn other(&self) -> PageId {
        match self {
            PageId::MainPage => PageId::Readme,
            PageId::Readme => PageId::MainPage,
        }
    }
}

impl FromStr for PageId {
    type Err = ();

    /// Accepts the short name or the element id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainpage" | "body-home-bottom-mainpage" => Ok(PageId::MainPage),
            "readme" | "body-home-bottom-readme" => Ok(PageId::Readme),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    To,
    From,
    Call,
}

/// What the mid-way callback does to the DOM
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSwap {
    pub activate: &'static str,
    pub add_class: &'static str,
    pub remove_class: &'static str,
    /// Applied to the activated page before it animates in
    pub set: IndexMap<&'static str, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub method: Method,
    pub target: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub props: IndexMap<&'static str, f64>,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<&'static str>,
    /// GSAP position parameter, e.g. `-=0.3`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stagger: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yoyo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<PageSwap>,
    /// Start time in seconds from the beginning of the timeline
    pub start: f64,
}

impl Step {
    fn tween(method: Method, target: &str, props: &[(&'static str, f64)], duration: f64) -> Self {
        Self {
            method,
            target: target.to_string(),
            props: props.iter().copied().collect(),
            duration,
            ease: None,
            position: None,
            stagger: None,
            yoyo: None,
            repeat: None,
            swap: None,
            start: 0.0,
        }
    }

    fn ease(mut self, ease: &'static str) -> Self {
        self.ease = Some(ease);
        self
    }

    fn at(mut self, position: &'static str) -> Self {
        self.position = Some(position);
        self
    }

    fn stagger(mut self, each: f64) -> Self {
        self.stagger = Some(each);
        self
    }

    /// Length of the step when it animates `items` elements
    pub fn span(&self, items: usize) -> f64 {
        let extra = self.stagger.unwrap_or(0.0) * items.saturating_sub(1) as f64;
        self.duration + extra
    }

    fn offset(&self) -> f64 {
        self.position
            .and_then(|p| p.strip_prefix("-="))
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| -v)
            .unwrap_or(0.0)
    }
}

/// Ordered steps of one transition plus the button pulse that runs
/// alongside it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub page: PageId,
    pub steps: Vec<Step>,
    pub pulse: Step,
    pub total_duration: f64,
}

impl Timeline {
    pub fn build(page: PageId) -> Self {
        // Header swings toward the opposite side of the target page
        let (swing, drift) = match page {
            PageId::MainPage => (-15.0, 150.0),
            PageId::Readme => (15.0, -150.0),
        };
        // Old page leaves upward for the main page, downward for readme
        let (leave_y, leave_rot) = match page {
            PageId::MainPage => (-50.0, 20.0),
            PageId::Readme => (50.0, -20.0),
        };
        let target = format!("#{}", page.element_id());

        let entrance = match page {
            PageId::MainPage => Step::tween(
                Method::From,
                &format!("{} .blog-large-card", target),
                &[("scale", 0.8), ("opacity", 0.0), ("y", 30.0)],
                0.4,
            )
            .ease("back.out(1.7)"),
            PageId::Readme => Step::tween(
                Method::From,
                &format!("{} .row", target),
                &[("scale", 0.9), ("opacity", 0.0), ("x", -30.0)],
                0.5,
            )
            .ease("power2.out"),
        };

        let mut swap_step = Step::tween(Method::Call, &target, &[], 0.0);
        swap_step.swap = Some(PageSwap {
            activate: page.element_id(),
            add_class: page.background(),
            remove_class: page.other().background(),
            set: [("opacity", 0.0), ("y", -leave_y), ("rotationX", -leave_rot)]
                .into_iter()
                .collect(),
        });

        let steps = vec![
            Step::tween(
                Method::To,
                HEADER,
                &[("rotationY", swing), ("x", drift), ("scale", 0.9)],
                0.6,
            )
            .ease("power2.inOut"),
            Step::tween(
                Method::To,
                ACTIVE_PAGE,
                &[("opacity", 0.0), ("y", leave_y), ("rotationX", leave_rot)],
                0.4,
            )
            .ease("power2.out")
            .at("-=0.3"),
            swap_step,
            Step::tween(
                Method::To,
                HEADER,
                &[("rotationY", 0.0), ("x", 0.0), ("scale", 1.0)],
                0.6,
            )
            .ease("back.out(1.7)"),
            Step::tween(
                Method::To,
                &target,
                &[("opacity", 1.0), ("y", 0.0), ("rotationX", 0.0)],
                0.5,
            )
            .ease("power2.out")
            .at("-=0.3"),
            entrance.stagger(0.1).at("-=0.2"),
        ];

        let mut pulse = Step::tween(
            Method::To,
            &format!("#{}", page.button_id()),
            &[("scale", 1.1)],
            0.1,
        )
        .ease("power2.inOut");
        pulse.yoyo = Some(true);
        pulse.repeat = Some(1);

        let mut timeline = Self {
            page,
            steps,
            pulse,
            total_duration: 0.0,
        };
        timeline.total_duration = timeline.schedule();
        timeline
    }

    /// Assign start times the way a GSAP timeline places children: at the
    /// current end, shifted by the position offset. Returns the end time
    /// with one staggered item.
    fn schedule(&mut self) -> f64 {
        let mut end: f64 = 0.0;
        for step in &mut self.steps {
            step.start = (end + step.offset()).max(0.0);
            end = end.max(step.start + step.span(1));
        }
        end
    }

    /// End time when the entrance staggers over `items` elements
    pub fn duration_with(&self, items: usize) -> f64 {
        self.steps
            .iter()
            .map(|step| step.start + step.span(items.max(1)))
            .fold(0.0, f64::max)
    }

    /// Start of the callback that swaps the active page
    pub fn swap_time(&self) -> Option<f64> {
        self.steps
            .iter()
            .find(|step| step.method == Method::Call)
            .map(|step| step.start)
    }
}

/// Tracks the shown page and the transition in progress
#[derive(Debug, Default)]
pub struct PageSwitcher {
    current: Option<PageId>,
    pending: Option<PageId>,
}

impl PageSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a page without animating
    pub fn show_initial(&mut self, page: PageId) {
        self.current = Some(page);
        self.pending = None;
    }

    /// Begin a transition. Nothing happens while another transition runs or
    /// when `page` is already shown.
    pub fn switch_to(&mut self, page: PageId) -> Option<Timeline> {
        if self.pending.is_some() || self.current == Some(page) {
            return None;
        }
        self.pending = Some(page);
        Some(Timeline::build(page))
    }

    /// Finish the running transition and commit its page
    pub fn complete(&mut self) -> Option<PageId> {
        let page = self.pending.take()?;
        self.current = Some(page);
        Some(page)
    }

    pub fn current(&self) -> Option<PageId> {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }
}
