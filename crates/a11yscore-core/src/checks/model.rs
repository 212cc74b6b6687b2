use serde::{Deserialize, Serialize};

/// Heuristic check results, one slot per check.
///
/// A slot is `None` when the check itself failed; the failure is recorded
/// in the report's analysis warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeuristicChecks {
    pub responsive: Option<ResponsiveCheck>,
    pub contrast: Option<ContrastCheck>,
    pub image_alt: Option<ImageAltCheck>,
    pub popup: Option<PopupCheck>,
}

/// Layout width measured at one window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthSample {
    pub window_width: u32,
    pub window_height: u32,
    /// `window.innerWidth`
    pub inner_width: u64,
    /// `document.body.scrollWidth`
    pub scroll_width: u64,
    pub horizontal_scroll: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveCheck {
    /// `content` of `<meta name="viewport">`, if the page declares one.
    pub viewport_meta: Option<String>,
    /// Measured at the initial window size, before the sweep.
    pub baseline: WidthSample,
    pub samples: Vec<WidthSample>,
    pub overflow_count: u32,
    pub passes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastCheck {
    /// Population standard deviation of grayscale pixel values (0..=127.5).
    pub contrast: f64,
    pub mean_luminance: f64,
    pub width: u32,
    pub height: u32,
    pub screenshot_sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAltCheck {
    pub image_count: u32,
    pub missing_alt_count: u32,
    pub first_image_present: bool,
    /// Alt text of the first image; `None` when absent or empty.
    pub first_image_alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PopupOutcome {
    NotFound,
    NoFocusableElements,
    Timeout,
    /// Focus left the element at `index` after TAB.
    FocusLost { index: usize },
    Accessible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupCheck {
    /// Selector that matched the displayed popup.
    pub selector: Option<String>,
    pub focusable_count: usize,
    pub keyboard_accessible: bool,
    pub outcome: PopupOutcome,
}

impl PopupCheck {
    pub fn not_found() -> Self {
        Self {
            selector: None,
            focusable_count: 0,
            keyboard_accessible: false,
            outcome: PopupOutcome::NotFound,
        }
    }

    pub fn found(&self) -> bool {
        self.selector.is_some()
    }
}
