//! Chrome driven over the DevTools protocol

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::{Browser as Chrome, LaunchOptions, LaunchOptionsBuilder, Tab};
use tracing::{debug, info};

use crate::checks::browser::{Browser, BrowserSession, ElementId};
use crate::error::{BenchError, Result};

pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1920, 1080);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeSettings {
    /// Chrome binary; when unset an installed Chrome is looked up
    pub binary: Option<PathBuf>,
    pub headless: bool,
    pub window_size: (u32, u32),
    /// How long the DevTools connection may stay silent before Chrome is dropped
    pub idle_timeout: Duration,
    /// Timeout for a single tab command
    pub command_timeout: Duration,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            binary: None,
            headless: false,
            window_size: DEFAULT_WINDOW_SIZE,
            idle_timeout: Duration::from_secs(300),
            command_timeout: Duration::from_secs(60),
        }
    }
}

/// Launches Chrome with one tab per session
pub struct ChromeLauncher {
    settings: ChromeSettings,
}

impl ChromeLauncher {
    pub fn new(settings: ChromeSettings) -> Self {
        Self { settings }
    }

    fn launch_options(&self) -> Result<LaunchOptions> {
        let mut builder = LaunchOptionsBuilder::default();
        builder
            .headless(self.settings.headless)
            .sandbox(false)
            .window_size(Some(self.settings.window_size))
            .idle_browser_timeout(self.settings.idle_timeout)
            .path(self.settings.binary.clone());

        builder
            .build()
            .map_err(|e| BenchError::Config(format!("invalid Chrome launch options: {e}")))
    }
}

impl Browser for ChromeLauncher {
    type Session = ChromeSession;

    fn launch(&mut self) -> Result<ChromeSession> {
        let chrome = Chrome::new(self.launch_options()?)
            .map_err(|e| browser_error("failed to launch Chrome", e))?;
        let tab = chrome
            .new_tab()
            .map_err(|e| browser_error("failed to open tab", e))?;
        tab.set_default_timeout(self.settings.command_timeout);

        info!(headless = self.settings.headless, "browser session started");
        Ok(ChromeSession {
            chrome: Some(chrome),
            tab: Some(tab),
        })
    }
}

/// A running Chrome and its tab. Chrome exits when the session is dropped.
///
/// Element handles carry the selector and are resolved again on each use, so
/// a handle stays valid across re-renders of the page.
pub struct ChromeSession {
    chrome: Option<Chrome>,
    tab: Option<Arc<Tab>>,
}

impl ChromeSession {
    fn tab(&self) -> Result<&Tab> {
        self.tab
            .as_deref()
            .ok_or_else(|| BenchError::Browser("session already closed".to_string()))
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| browser_error(&format!("navigation to {url} failed"), e))?;
        debug!(url, "navigated");
        Ok(())
    }

    fn find_element(&mut self, css: &str) -> Result<ElementId> {
        self.tab()?
            .find_element(css)
            .map_err(|e| lookup_error(css, e))?;
        Ok(ElementId(css.to_string()))
    }

    fn click(&mut self, element: &ElementId) -> Result<()> {
        let css = element.0.as_str();
        let found = self.tab()?.find_element(css).map_err(|e| lookup_error(css, e))?;
        found
            .click()
            .map_err(|e| browser_error(&format!("click on {css} failed"), e))?;
        Ok(())
    }

    fn element_text(&mut self, element: &ElementId) -> Result<String> {
        let css = element.0.as_str();
        let found = self.tab()?.find_element(css).map_err(|e| lookup_error(css, e))?;
        found
            .get_inner_text()
            .map_err(|e| browser_error(&format!("reading text of {css} failed"), e))
    }

    fn quit(&mut self) -> Result<()> {
        self.tab = None;
        if self.chrome.take().is_some() {
            info!("browser session closed");
        }
        Ok(())
    }
}

/// A selector that matches nothing is "not ready"; anything else is fatal
fn lookup_error(css: &str, e: anyhow::Error) -> BenchError {
    if e.downcast_ref::<NoElementFound>().is_some() {
        BenchError::ElementNotFound(css.to_string())
    } else {
        browser_error(&format!("lookup of {css} failed"), e)
    }
}

fn browser_error(context: &str, e: anyhow::Error) -> BenchError {
    BenchError::Browser(format!("{context}: {e:#}"))
}
