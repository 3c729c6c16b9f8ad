//! Browser benchmark: run Speedometer 3.0 and read the final score

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{BenchError, Result};
use crate::poll::{poll_until, CancelToken, PollSettings};
use crate::report::Metrics;
use crate::thresholds::BrowserThresholds;

pub const SPEEDOMETER_URL: &str = "https://browserbench.org/Speedometer3.0/#summary";
pub const START_BUTTON_SELECTOR: &str = "[aria-label=\"Start test\"]";
pub const SCORE_SELECTOR: &str = ".dashboard__score";

/// Opaque handle to an element inside a browser session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementId(pub String);

/// A live browser, driven through find/click/read-text
pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Locate the first element matching a CSS selector
    fn find_element(&mut self, css: &str) -> Result<ElementId>;

    fn click(&mut self, element: &ElementId) -> Result<()>;

    fn element_text(&mut self, element: &ElementId) -> Result<String>;

    /// Close the browser. Calling it again after success is a no-op.
    fn quit(&mut self) -> Result<()>;
}

/// Starts browser sessions
pub trait Browser {
    type Session: BrowserSession;

    fn launch(&mut self) -> Result<Self::Session>;
}

/// Owns a session and quits it when dropped, on every exit path
pub struct SessionGuard<S: BrowserSession> {
    session: S,
}

impl<S: BrowserSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: BrowserSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: BrowserSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: BrowserSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.session.quit() {
            warn!(error = %e, "failed to quit browser session");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub benchmark_url: String,
    pub start_selector: String,
    pub score_selector: String,
    pub poll: PollSettings,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            benchmark_url: SPEEDOMETER_URL.to_string(),
            start_selector: START_BUTTON_SELECTOR.to_string(),
            score_selector: SCORE_SELECTOR.to_string(),
            poll: PollSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrowserMetrics {
    pub speedometer_score: f64,
}

impl Metrics for BrowserMetrics {
    type Thresholds = BrowserThresholds;

    fn passes(&self, thresholds: &BrowserThresholds) -> bool {
        self.speedometer_score >= thresholds.speedometer_score
    }
}

/// Launch a session, start the benchmark and wait for its score
pub fn measure<B: Browser>(
    browser: &mut B,
    settings: &BrowserSettings,
    cancel: &CancelToken,
) -> Result<BrowserMetrics> {
    let mut session = SessionGuard::new(browser.launch()?);

    session.navigate(&settings.benchmark_url)?;
    let start = session.find_element(&settings.start_selector)?;
    session.click(&start)?;

    println!("Running Speedometer 3.0 benchmark (this may take several minutes)...");
    info!(url = %settings.benchmark_url, timeout_s = settings.poll.timeout.as_secs(), "benchmark started");

    let score = poll_until("benchmark score", settings.poll, cancel, || {
        read_score(&mut *session, &settings.score_selector)
    })?;

    info!(score, "benchmark finished");
    Ok(BrowserMetrics {
        speedometer_score: score,
    })
}

/// Read the score element; an unparsable value means the run has not finished
fn read_score<S: BrowserSession>(session: &mut S, selector: &str) -> Result<f64> {
    let element = session.find_element(selector)?;
    let text = session.element_text(&element)?;
    text.trim().parse::<f64>().map_err(|_| {
        BenchError::ElementNotFound(format!("{selector} has no score yet (text {text:?})"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::MIN_REQUIREMENTS;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Session whose score element shows `texts` in turn, then the last one forever
    struct ScriptedSession {
        texts: Vec<&'static str>,
        reads: usize,
        quits: Rc<Cell<u32>>,
        navigate_error: bool,
    }

    impl BrowserSession for ScriptedSession {
        fn navigate(&mut self, _url: &str) -> Result<()> {
            if self.navigate_error {
                return Err(BenchError::Browser("net::ERR_NAME_NOT_RESOLVED".to_string()));
            }
            Ok(())
        }

        fn find_element(&mut self, css: &str) -> Result<ElementId> {
            Ok(ElementId(css.to_string()))
        }

        fn click(&mut self, _element: &ElementId) -> Result<()> {
            Ok(())
        }

        fn element_text(&mut self, _element: &ElementId) -> Result<String> {
            let idx = self.reads.min(self.texts.len() - 1);
            self.reads += 1;
            Ok(self.texts[idx].to_string())
        }

        fn quit(&mut self) -> Result<()> {
            self.quits.set(self.quits.get() + 1);
            Ok(())
        }
    }

    struct ScriptedBrowser {
        texts: Vec<&'static str>,
        quits: Rc<Cell<u32>>,
        navigate_error: bool,
    }

    impl Browser for ScriptedBrowser {
        type Session = ScriptedSession;

        fn launch(&mut self) -> Result<ScriptedSession> {
            Ok(ScriptedSession {
                texts: self.texts.clone(),
                reads: 0,
                quits: Rc::clone(&self.quits),
                navigate_error: self.navigate_error,
            })
        }
    }

    fn settings() -> BrowserSettings {
        BrowserSettings {
            poll: PollSettings {
                interval: Duration::from_millis(1),
                timeout: Duration::from_millis(50),
            },
            ..BrowserSettings::default()
        }
    }

    #[test]
    fn test_waits_for_score() {
        let quits = Rc::new(Cell::new(0));
        let mut browser = ScriptedBrowser {
            texts: vec!["", "-", " 12.5 "],
            quits: Rc::clone(&quits),
            navigate_error: false,
        };

        let metrics = measure(&mut browser, &settings(), &CancelToken::new()).unwrap();
        assert_eq!(metrics.speedometer_score, 12.5);
        assert!(metrics.passes(&MIN_REQUIREMENTS.browser));
        assert_eq!(quits.get(), 1);
    }

    #[test]
    fn test_session_released_on_error() {
        let quits = Rc::new(Cell::new(0));
        let mut browser = ScriptedBrowser {
            texts: vec!["10.0"],
            quits: Rc::clone(&quits),
            navigate_error: true,
        };

        let err = measure(&mut browser, &settings(), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, BenchError::Browser(_)));
        assert_eq!(quits.get(), 1);
    }

    #[test]
    fn test_session_released_on_timeout() {
        let quits = Rc::new(Cell::new(0));
        let mut browser = ScriptedBrowser {
            texts: vec!["Running..."],
            quits: Rc::clone(&quits),
            navigate_error: false,
        };

        let err = measure(&mut browser, &settings(), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, BenchError::Timeout { .. }));
        assert_eq!(quits.get(), 1);
    }

    #[test]
    fn test_score_threshold_is_inclusive() {
        let at = BrowserMetrics {
            speedometer_score: 10.0,
        };
        let below = BrowserMetrics {
            speedometer_score: 9.99,
        };
        assert!(at.passes(&MIN_REQUIREMENTS.browser));
        assert!(!below.passes(&MIN_REQUIREMENTS.browser));
    }
}
