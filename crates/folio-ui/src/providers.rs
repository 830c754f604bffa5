//! Page-level integrations: theme, smooth scroll, analytics and toasts.
//!
//! Every provider is plain typed configuration built by
//! [`Providers::from_config`]. Each contributes markup for `<head>` and a body
//! script that mounts on `DOMContentLoaded` and tears down on `pagehide`.

use folio_core::{
    Config,
    config::{AnalyticsConfig, ScrollConfig, ThemeConfig, ThemeMode, ToasterConfig},
};
use serde::Serialize;

use crate::{
    copy::{COPY_FAILURE_MESSAGE, COPY_RESET, COPY_SUCCESS_MESSAGE},
    escape_attr,
};

/// `localStorage` key holding the visitor's theme.
pub const THEME_STORAGE_KEY: &str = "folio-theme";

/// How long a toast stays on screen, in milliseconds.
pub const TOAST_DURATION_MS: u64 = 4000;

/// Scroll easing as shipped to the browser.
pub const SCROLL_EASING_JS: &str = "(t) => Math.min(1, 1.001 - Math.pow(2, -10 * t))";

/// Markup contributed by a provider.
pub trait Provider {
    /// Markup for `<head>`.
    fn head(&self) -> String {
        String::new()
    }

    /// Markup appended to `<body>`.
    fn body(&self) -> String {
        String::new()
    }
}

/// Wrap mount and teardown steps in a self-contained script.
fn lifecycle_script(name: &str, setup: &str, mount: &str, teardown: &str) -> String {
    format!(
        r#"<script data-provider="{name}">
(() => {{
{setup}
  const mount = () => {{
{mount}
  }};
  const teardown = () => {{
{teardown}
  }};
  if (document.readyState === "loading") {{
    document.addEventListener("DOMContentLoaded", mount, {{ once: true }});
  }} else {{
    mount();
  }}
  window.addEventListener("pagehide", teardown, {{ once: true }});
}})();
</script>"#
    )
}

/// Light/dark theme switching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeProvider {
    pub default_mode: ThemeMode,
    pub enable_system: bool,
    pub disable_transition_on_change: bool,
}

impl ThemeProvider {
    #[must_use]
    pub fn new(config: &ThemeConfig) -> Self {
        Self {
            default_mode: config.default_mode,
            enable_system: config.enable_system,
            disable_transition_on_change: config.disable_transition_on_change,
        }
    }

    /// Floating toggle button bound by the mount script.
    #[must_use]
    pub fn toggle_button(&self) -> String {
        r#"<button type="button" class="theme-toggle" data-theme-toggle aria-label="Toggle theme"><span class="sun">&#9788;</span><span class="moon">&#9790;</span></button>"#
            .to_string()
    }

    fn apply_fn(&self) -> String {
        format!(
            r#"  const apply = (mode) => {{
    const root = document.documentElement;
    const dark = mode === "dark" || (mode === "system" && {system} && matchMedia("(prefers-color-scheme: dark)").matches);
    root.classList.toggle("dark", dark);
    root.dataset.theme = dark ? "dark" : "light";
  }};
  const current = () => localStorage.getItem("{key}") || "{default}";"#,
            system = self.enable_system,
            key = THEME_STORAGE_KEY,
            default = self.default_mode.as_str(),
        )
    }
}

impl Provider for ThemeProvider {
    /// Pre-paint script so the first frame already has the right theme.
    fn head(&self) -> String {
        format!(
            "<script data-provider=\"theme-init\">\n(() => {{\n{}\n  apply(current());\n}})();\n</script>",
            self.apply_fn()
        )
    }

    fn body(&self) -> String {
        let setup = format!(
            r#"{apply}
  const media = matchMedia("(prefers-color-scheme: dark)");
  const onSystem = () => {{ if (current() === "system") apply("system"); }};
  const withoutTransitions = (fn) => {{
    if (!{disable}) return fn();
    const style = document.createElement("style");
    style.textContent = "*,*::before,*::after{{transition:none!important}}";
    document.head.appendChild(style);
    fn();
    getComputedStyle(document.body);
    setTimeout(() => style.remove(), 1);
  }};
  const onToggle = () => {{
    const next = document.documentElement.dataset.theme === "dark" ? "light" : "dark";
    localStorage.setItem("{key}", next);
    withoutTransitions(() => apply(next));
  }};
  let buttons = [];"#,
            apply = self.apply_fn(),
            disable = self.disable_transition_on_change,
            key = THEME_STORAGE_KEY,
        );
        let mount = format!(
            r#"    buttons = Array.from(document.querySelectorAll("[data-theme-toggle]"));
    buttons.forEach((b) => b.addEventListener("click", onToggle));
    if ({system}) media.addEventListener("change", onSystem);"#,
            system = self.enable_system,
        );
        let teardown = r#"    buttons.forEach((b) => b.removeEventListener("click", onToggle));
    media.removeEventListener("change", onSystem);"#;

        lifecycle_script("theme", &setup, &mount, teardown)
    }
}

/// Options handed to the smooth scroll script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollOptions {
    pub duration: f64,
    pub touch_multiplier: f64,
    pub infinite: bool,
    pub anchors: bool,
}

/// Smooth scrolling for wheel, touch and in-page anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollProvider {
    pub options: ScrollOptions,
}

impl ScrollProvider {
    /// `None` when smooth scrolling is disabled.
    #[must_use]
    pub fn new(config: &ScrollConfig) -> Option<Self> {
        config.enabled.then(|| Self {
            options: ScrollOptions {
                duration: config.duration,
                touch_multiplier: config.touch_multiplier,
                infinite: config.infinite,
                anchors: config.anchors,
            },
        })
    }

    /// Easing curve: `min(1, 1.001 - 2^(-10t))`.
    #[must_use]
    pub fn ease(t: f64) -> f64 {
        (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
    }

    /// Options as a JSON object literal.
    #[must_use]
    pub fn options_json(&self) -> String {
        serde_json::json!(self.options).to_string()
    }
}

impl Provider for ScrollProvider {
    fn body(&self) -> String {
        let setup = format!(
            r##"  const options = {options};
  const easing = {easing};
  let frame = 0;
  let touchY = null;
  const scrollTo = (target) => {{
    cancelAnimationFrame(frame);
    const max = document.documentElement.scrollHeight - innerHeight;
    let to = target;
    if (options.infinite) {{
      to = ((to % (max + 1)) + max + 1) % (max + 1);
    }} else {{
      to = Math.max(0, Math.min(max, to));
    }}
    const from = scrollY;
    const start = performance.now();
    const step = (now) => {{
      const t = Math.min(1, (now - start) / (options.duration * 1000));
      window.scrollTo(0, from + (to - from) * easing(t));
      if (t < 1) frame = requestAnimationFrame(step);
    }};
    frame = requestAnimationFrame(step);
  }};
  const onClick = (event) => {{
    const link = event.target.closest && event.target.closest('a[href^="#"]');
    if (!link) return;
    const target = document.getElementById(decodeURIComponent(link.hash.slice(1)));
    if (!target) return;
    event.preventDefault();
    scrollTo(scrollY + target.getBoundingClientRect().top);
    history.pushState(null, "", link.hash);
  }};
  const onTouchStart = (event) => {{ touchY = event.touches[0].clientY; }};
  const onTouchMove = (event) => {{
    if (touchY === null) return;
    const y = event.touches[0].clientY;
    event.preventDefault();
    scrollTo(scrollY + (touchY - y) * options.touchMultiplier);
    touchY = y;
  }};"##,
            options = self.options_json(),
            easing = SCROLL_EASING_JS,
        );
        let mount = r#"    if (options.anchors) document.addEventListener("click", onClick);
    addEventListener("touchstart", onTouchStart, { passive: true });
    addEventListener("touchmove", onTouchMove, { passive: false });"#;
        let teardown = r#"    cancelAnimationFrame(frame);
    document.removeEventListener("click", onClick);
    removeEventListener("touchstart", onTouchStart);
    removeEventListener("touchmove", onTouchMove);"#;

        lifecycle_script("scroll", &setup, mount, teardown)
    }
}

/// Third-party analytics script tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsProvider {
    pub enabled: bool,
    pub script_src: Option<String>,
}

impl AnalyticsProvider {
    #[must_use]
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            enabled: config.enabled,
            script_src: config.script_src.clone(),
        }
    }
}

impl Provider for AnalyticsProvider {
    fn head(&self) -> String {
        match (&self.script_src, self.enabled) {
            (Some(src), true) => format!(
                r#"<script defer src="{}" data-provider="analytics"></script>"#,
                escape_attr(src)
            ),
            _ => String::new(),
        }
    }
}

/// Toast container and the `window.folioToast(kind, message)` API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toaster {
    pub position: String,
}

impl Toaster {
    #[must_use]
    pub fn new(config: &ToasterConfig) -> Self {
        Self {
            position: config.position.clone(),
        }
    }
}

impl Provider for Toaster {
    fn body(&self) -> String {
        let container = format!(
            r#"<div class="toaster" data-position="{}" role="status" aria-live="polite"></div>"#,
            escape_attr(&self.position)
        );
        let setup = format!(
            r#"  const timers = new Set();
  const toast = (kind, message) => {{
    const root = document.querySelector(".toaster");
    if (!root) return;
    const item = document.createElement("div");
    item.className = "toast toast-" + kind;
    item.textContent = message;
    root.appendChild(item);
    const timer = setTimeout(() => {{ item.remove(); timers.delete(timer); }}, {duration});
    timers.add(timer);
  }};"#,
            duration = TOAST_DURATION_MS,
        );
        let mount = "    window.folioToast = toast;";
        let teardown = r#"    timers.forEach(clearTimeout);
    timers.clear();
    if (window.folioToast === toast) delete window.folioToast;"#;

        container + &lifecycle_script("toaster", &setup, mount, teardown)
    }
}

/// Browser side of the code block copy button.
///
/// Success writes `data-code` to the clipboard, flips the button to
/// `copied` and schedules a reset [`COPY_RESET`] later, replacing any pending
/// reset. Failure keeps the button idle and shows an error toast.
#[must_use]
pub fn copy_script() -> String {
    let setup = format!(
        r#"  const timers = new Map();
  const notify = (kind, message) => {{ if (window.folioToast) window.folioToast(kind, message); }};
  const write = (text) => navigator.clipboard
    ? navigator.clipboard.writeText(text)
    : Promise.reject(new Error("clipboard unavailable"));
  const onClick = (event) => {{
    const button = event.target.closest && event.target.closest(".copy-button");
    if (!button) return;
    clearTimeout(timers.get(button));
    write(button.dataset.code || "").then(() => {{
      button.dataset.state = "copied";
      timers.set(button, setTimeout(() => {{ button.dataset.state = "idle"; timers.delete(button); }}, {reset}));
      notify("success", "{ok}");
    }}, () => {{
      button.dataset.state = "idle";
      timers.delete(button);
      notify("error", "{fail}");
    }});
  }};"#,
        reset = COPY_RESET.as_millis(),
        ok = COPY_SUCCESS_MESSAGE,
        fail = COPY_FAILURE_MESSAGE,
    );
    let mount = r#"    document.addEventListener("click", onClick);"#;
    let teardown = r#"    document.removeEventListener("click", onClick);
    timers.forEach((t) => clearTimeout(t));
    timers.clear();"#;

    lifecycle_script("copy", &setup, mount, teardown)
}

/// All providers for a page.
#[derive(Debug, Clone)]
pub struct Providers {
    pub theme: ThemeProvider,
    pub scroll: Option<ScrollProvider>,
    pub analytics: AnalyticsProvider,
    pub toaster: Toaster,
}

impl Providers {
    /// Build every provider from site configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            theme: ThemeProvider::new(&config.theme),
            scroll: ScrollProvider::new(&config.scroll),
            analytics: AnalyticsProvider::new(&config.analytics),
            toaster: Toaster::new(&config.toaster),
        }
    }

    /// Combined `<head>` markup.
    #[must_use]
    pub fn head(&self) -> String {
        [self.theme.head(), self.analytics.head()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Combined body markup, including the copy button script.
    #[must_use]
    pub fn body(&self) -> String {
        let mut parts = vec![self.toaster.body(), self.theme.body()];
        if let Some(scroll) = &self.scroll {
            parts.push(scroll.body());
        }
        parts.push(copy_script());
        parts.join("\n")
    }
}
