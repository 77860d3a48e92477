//! URL transform rules: path → sitemap priority and change frequency.
//!
//! Rules are an ordered, immutable list evaluated top to bottom; the first
//! matching rule wins and the last rule matches everything, so
//! classification is total over valid [`RoutePath`]s.

use std::sync::LazyLock;

use sitekit_shared::{ChangeFrequency, RoutePath};

/// Sitemap hints assigned to one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub priority: f32,
    pub change_frequency: ChangeFrequency,
}

impl Classification {
    const fn new(priority: f32, change_frequency: ChangeFrequency) -> Self {
        Self {
            priority,
            change_frequency,
        }
    }
}

/// Which paths a rule applies to.
#[derive(Debug, Clone)]
enum PathMatcher {
    /// Path equals one of these.
    Exact(&'static [&'static str]),
    /// Path starts with one of these.
    Prefix(&'static [&'static str]),
    Any,
}

impl PathMatcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(paths) => paths.contains(&path),
            Self::Prefix(prefixes) => prefixes.iter().any(|p| path.starts_with(p)),
            Self::Any => true,
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    matcher: PathMatcher,
    result: Classification,
}

/// Holds classification rules in evaluation order.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

/// Result of the catch-all rule.
const DEFAULT_CLASSIFICATION: Classification =
    Classification::new(0.7, ChangeFrequency::Weekly);

impl RuleTable {
    /// The site's rule table, most specific first, catch-all last.
    pub fn standard() -> Self {
        use ChangeFrequency::{Daily, Monthly, Weekly};

        Self {
            rules: vec![
                Rule {
                    matcher: PathMatcher::Exact(&["/"]),
                    result: Classification::new(1.0, Daily),
                },
                Rule {
                    matcher: PathMatcher::Exact(&["/about", "/services", "/contact"]),
                    result: Classification::new(0.9, Weekly),
                },
                Rule {
                    matcher: PathMatcher::Exact(&["/blog", "/case-studies"]),
                    result: Classification::new(0.8, Daily),
                },
                Rule {
                    matcher: PathMatcher::Prefix(&["/blog/", "/case-studies/"]),
                    result: Classification::new(0.7, Monthly),
                },
                Rule {
                    matcher: PathMatcher::Any,
                    result: DEFAULT_CLASSIFICATION,
                },
            ],
        }
    }

    /// Classify a path with the first matching rule.
    pub fn classify(&self, path: &RoutePath) -> Classification {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path.as_str()))
            .map_or(DEFAULT_CLASSIFICATION, |rule| rule.result)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

static STANDARD_RULES: LazyLock<RuleTable> = LazyLock::new(RuleTable::standard);

/// The standard rule table, built once per process.
pub fn standard_rules() -> &'static RuleTable {
    &STANDARD_RULES
}

/// Classify `path` against the standard rule table.
pub fn classify(path: &RoutePath) -> Classification {
    STANDARD_RULES.classify(path)
}

/// Whether `path` falls under any excluded prefix.
///
/// Exclusion is decided before classification; excluded paths are never
/// classified.
pub fn is_excluded<S: AsRef<str>>(path: &RoutePath, excluded_prefixes: &[S]) -> bool {
    excluded_prefixes
        .iter()
        .any(|prefix| path.as_str().starts_with(prefix.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_shared::MANDATORY_EXCLUDED_PREFIXES;

    fn classify_str(path: &str) -> (f32, ChangeFrequency) {
        let c = classify(&RoutePath::parse(path).unwrap());
        (c.priority, c.change_frequency)
    }

    #[test]
    fn documented_classifications() {
        assert_eq!(classify_str("/"), (1.0, ChangeFrequency::Daily));
        assert_eq!(classify_str("/about"), (0.9, ChangeFrequency::Weekly));
        assert_eq!(classify_str("/services"), (0.9, ChangeFrequency::Weekly));
        assert_eq!(classify_str("/contact"), (0.9, ChangeFrequency::Weekly));
        assert_eq!(classify_str("/blog"), (0.8, ChangeFrequency::Daily));
        assert_eq!(classify_str("/case-studies"), (0.8, ChangeFrequency::Daily));
        assert_eq!(classify_str("/blog/my-post"), (0.7, ChangeFrequency::Monthly));
        assert_eq!(
            classify_str("/case-studies/fintech"),
            (0.7, ChangeFrequency::Monthly)
        );
        assert_eq!(classify_str("/random-page"), (0.7, ChangeFrequency::Weekly));
    }

    #[test]
    fn exact_rules_do_not_match_children_or_lookalikes() {
        assert_eq!(classify_str("/about/team"), (0.7, ChangeFrequency::Weekly));
        assert_eq!(classify_str("/blogroll"), (0.7, ChangeFrequency::Weekly));
    }

    #[test]
    fn trailing_slash_classifies_as_listing() {
        // `/blog/` normalizes to `/blog`, so it is the listing, not a post.
        assert_eq!(classify_str("/blog/"), (0.8, ChangeFrequency::Daily));
    }

    #[test]
    fn classification_stays_in_range() {
        let paths = [
            "/",
            "/about",
            "/blog",
            "/blog/a",
            "/case-studies/b/c",
            "/pricing",
            "/x/y/z",
            "/%E2%9C%93",
        ];
        for path in paths {
            let c = classify(&RoutePath::parse(path).unwrap());
            assert!((0.0..=1.0).contains(&c.priority), "{path}: {}", c.priority);
            assert!(ChangeFrequency::ALL.contains(&c.change_frequency));
        }
    }

    #[test]
    fn exclusion_prefixes() {
        let excluded =
            |p: &str| is_excluded(&RoutePath::parse(p).unwrap(), &MANDATORY_EXCLUDED_PREFIXES);
        assert!(excluded("/api/contact"));
        assert!(excluded("/studio"));
        assert!(excluded("/studio/desk"));
        assert!(excluded("/demo"));
        assert!(excluded("/demo-booking"));
        assert!(!excluded("/api"));
        assert!(!excluded("/about"));
        assert!(!excluded("/"));
    }

    #[test]
    fn standard_table_is_shared() {
        assert!(std::ptr::eq(standard_rules(), standard_rules()));
        let about = RoutePath::parse("/about").unwrap();
        assert_eq!(standard_rules().classify(&about), classify(&about));
    }
}
