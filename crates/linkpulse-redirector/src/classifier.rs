//! Client agent classification.
//!
//! [`SubstringClassifier`] is a deliberately coarse heuristic, not a
//! user-agent grammar: it checks a handful of ordered substrings and the first
//! match wins. Known misclassifications follow directly from the ordering,
//! e.g. Edge and Opera report `Chrome`, Android agents usually contain
//! `Linux` and are reported as Linux, and iOS agents contain `Mac OS X` and
//! are reported as MacOS. A real parser can replace it behind [`Classifier`]
//! without touching the recorder.

use linkpulse_core::{Browser, ClientInfo, Device, Os};

/// Maps a raw client agent string to a classification.
pub trait Classifier: Send + Sync + 'static {
    fn classify(&self, user_agent: &str) -> ClientInfo;
}

const BROWSERS: &[(&str, Browser)] = &[
    ("Chrome", Browser::Chrome),
    ("Firefox", Browser::Firefox),
    ("Safari", Browser::Safari),
];

const OPERATING_SYSTEMS: &[(&str, Os)] = &[
    ("Windows", Os::Windows),
    ("Mac", Os::MacOs),
    ("Linux", Os::Linux),
    ("Android", Os::Android),
    ("iOS", Os::Ios),
];

fn first_match<T: Copy>(user_agent: &str, table: &[(&str, T)], fallback: T) -> T {
    table
        .iter()
        .find(|(needle, _)| user_agent.contains(needle))
        .map_or(fallback, |(_, label)| *label)
}

/// Ordered, case-sensitive, first-match-wins substring checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringClassifier;

impl SubstringClassifier {
    pub fn classify(user_agent: &str) -> ClientInfo {
        ClientInfo {
            browser: first_match(user_agent, BROWSERS, Browser::Other),
            os: first_match(user_agent, OPERATING_SYSTEMS, Os::Other),
            device: if user_agent.contains("Mobile") {
                Device::Mobile
            } else {
                Device::Desktop
            },
        }
    }
}

impl Classifier for SubstringClassifier {
    fn classify(&self, user_agent: &str) -> ClientInfo {
        SubstringClassifier::classify(user_agent)
    }
}
