//! Crumb extraction from the history page markup.
//!
//! The page layout is undocumented and changes without notice, so extraction
//! sits behind [`CrumbExtractor`] and each strategy can be replaced alone.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Pulls the crumb token out of an HTML body. `None` means not found.
pub trait CrumbExtractor: Send + Sync {
    fn name(&self) -> &str;

    fn extract(&self, body: &str) -> Option<String>;
}

fn crumb_store_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""CrumbStore"\s*:\s*\{\s*"crumb"\s*:\s*"((?:[^"\\]|\\.)*)"\s*\}"#)
            .unwrap_or_else(|e| panic!("invalid CrumbStore pattern: {e}"))
    })
}

/// Decode JSON string escapes (`/`, `\"`, ...) in a captured token.
/// Falls back to the raw capture if it is not a valid JSON string body.
fn unescape_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

/// Regex scan for `"CrumbStore":{"crumb":"<token>"}` anywhere in the body.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrumbStorePattern;

impl CrumbExtractor for CrumbStorePattern {
    fn name(&self) -> &str {
        "crumb_store"
    }

    fn extract(&self, body: &str) -> Option<String> {
        let caps = crumb_store_regex().captures(body)?;
        let token = unescape_json_string(caps.get(1)?.as_str());
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

/// Parses the `root.App.main = {...};` state object as JSON and walks to
/// `context.dispatcher.stores.CrumbStore.crumb`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppStateCrumb;

impl AppStateCrumb {
    const MARKER: &'static str = "root.App.main";
    const POINTER: &'static str = "/context/dispatcher/stores/CrumbStore/crumb";

    fn app_state(body: &str) -> Option<Value> {
        let after_marker = &body[body.find(Self::MARKER)? + Self::MARKER.len()..];
        let after_assign = after_marker.trim_start().strip_prefix('=')?;
        let object = &after_assign[after_assign.find('{')?..];
        // Stream deserializer stops after the first complete value, ignoring
        // the trailing `;` and the rest of the script.
        serde_json::Deserializer::from_str(object)
            .into_iter::<Value>()
            .next()?
            .ok()
    }
}

impl CrumbExtractor for AppStateCrumb {
    fn name(&self) -> &str {
        "app_state"
    }

    fn extract(&self, body: &str) -> Option<String> {
        let state = Self::app_state(body)?;
        state
            .pointer(Self::POINTER)?
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Tries each strategy in order and returns the first token found.
pub struct FirstMatch {
    strategies: Vec<Box<dyn CrumbExtractor>>,
}

impl FirstMatch {
    pub fn new(strategies: Vec<Box<dyn CrumbExtractor>>) -> Self {
        Self { strategies }
    }
}

impl CrumbExtractor for FirstMatch {
    fn name(&self) -> &str {
        "first_match"
    }

    fn extract(&self, body: &str) -> Option<String> {
        self.strategies.iter().find_map(|s| {
            let token = s.extract(body);
            if token.is_none() {
                tracing::debug!(strategy = s.name(), "crumb strategy found nothing");
            }
            token
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <script>
            (function (root) {
                root.App || (root.App = {});
                root.App.main = {
                  "context": {
                    "dispatcher": {
                      "stores": {
                        "FlyoutStore": {},
                        "CrumbStore": {
                          "crumb": "fCv.rYUxTML"
                        },
                        "HeaderStore": {}
                      }
                    },
                    "options": {}
                  },
                  "plugins": {}
                };
            }(this));
        </script>
        </body></html>
    "#;

    #[test]
    fn pattern_finds_inline_fragment() {
        let body = r#"..."CrumbStore": {"crumb": "crumb.Test"},..."#;
        assert_eq!(CrumbStorePattern.extract(body).as_deref(), Some("crumb.Test"));
    }

    #[test]
    fn pattern_tolerates_multiline_whitespace() {
        assert_eq!(CrumbStorePattern.extract(PAGE).as_deref(), Some("fCv.rYUxTML"));
    }

    #[test]
    fn pattern_decodes_escapes() {
        let body = r#""CrumbStore":{"crumb":"ab\u002Fc\"d"}"#;
        assert_eq!(CrumbStorePattern.extract(body).as_deref(), Some("ab/c\"d"));
    }

    #[test]
    fn pattern_stops_at_first_unescaped_quote() {
        let body = r#""CrumbStore":{"crumb":"tok"},"Other":{"crumb":"nope"}"#;
        assert_eq!(CrumbStorePattern.extract(body).as_deref(), Some("tok"));
    }

    #[test]
    fn pattern_missing_store() {
        assert!(CrumbStorePattern.extract("<html>no token here</html>").is_none());
        assert!(CrumbStorePattern
            .extract(r#""CrumbStore":{"crumb":""}"#)
            .is_none());
    }

    #[test]
    fn app_state_walks_json() {
        assert_eq!(AppStateCrumb.extract(PAGE).as_deref(), Some("fCv.rYUxTML"));
    }

    #[test]
    fn app_state_missing_assignment() {
        assert!(AppStateCrumb.extract("<script>root.App.other = {};</script>").is_none());
        assert!(AppStateCrumb.extract("root.App.main = {broken").is_none());
    }

    #[test]
    fn app_state_missing_store() {
        let body = r#"root.App.main = {"context": {"dispatcher": {"stores": {}}}};"#;
        assert!(AppStateCrumb.extract(body).is_none());
    }

    #[test]
    fn first_match_falls_through() {
        let chain = FirstMatch::new(vec![Box::new(AppStateCrumb), Box::new(CrumbStorePattern)]);
        let body = r#"<script>var x = {"CrumbStore":{"crumb":"z9"}};</script>"#;
        assert_eq!(chain.extract(body).as_deref(), Some("z9"));
        assert!(chain.extract("<html></html>").is_none());
    }
}
