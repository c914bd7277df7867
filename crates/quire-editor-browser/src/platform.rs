//! Browser detection for the keymap modifier and the popup divider.

use std::sync::OnceLock;

/// What the editor needs to know about the browser it runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Platform {
    /// macOS desktop; `Mod-` bindings use Cmd.
    pub mac: bool,
    /// Safari, including every iOS browser except Chrome for iOS.
    pub safari: bool,
}

impl Platform {
    /// Classify a browser from its navigator strings.
    ///
    /// A "mac" platform with touch points is an iPad asking for the desktop
    /// site, which is not a Mac for key bindings.
    pub fn from_navigator(user_agent: &str, platform: &str, vendor: &str, touch_points: i32) -> Self {
        let ua = user_agent.to_lowercase();
        let platform = platform.to_lowercase();

        let ios = ["iphone", "ipad", "ipod"].iter().any(|d| ua.contains(d))
            || (platform.contains("mac") && touch_points > 0);
        let safari = (ua.contains("safari") && !ua.contains("chrome"))
            || (vendor.contains("Apple") && !ua.contains("crios"));

        Self {
            mac: platform.contains("mac") && !ios,
            safari,
        }
    }

    /// Whether a disabled `<option>` renders as a thin separator line.
    ///
    /// Safari draws it as a full-height blank row.
    pub fn supports_select_divider(&self) -> bool {
        !self.safari
    }
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

/// Get cached platform info. Detection runs once on first call.
pub fn platform() -> &'static Platform {
    PLATFORM.get_or_init(detect_platform)
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
fn detect_platform() -> Platform {
    let Some(window) = web_sys::window() else {
        return Platform::default();
    };
    let navigator = window.navigator();
    let detected = Platform::from_navigator(
        &navigator.user_agent().unwrap_or_default(),
        &navigator.platform().unwrap_or_default(),
        &navigator.vendor(),
        navigator.max_touch_points(),
    );
    tracing::debug!(platform = ?detected, "detected platform");
    detected
}

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
fn detect_platform() -> Platform {
    Platform::default()
}
