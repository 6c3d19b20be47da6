//! Keyword filter: plain substring containment over lowercased text.
//!
//! Keywords carry their own padding (`" cnn "`), which is what keeps them from
//! matching inside longer words. They are never trimmed before matching.

/// Tag used when the keyword list is empty and everything matches.
pub const MATCH_ALL_TAG: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Lowercases keywords, drops whitespace-only entries and repeated ones (first wins).
    ///
    /// A list made only of blank entries ends up empty, i.e. match-all.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for k in keywords {
            let k = k.as_ref().to_lowercase();
            if k.trim().is_empty() {
                tracing::warn!(keyword = ?k, "ignoring blank keyword");
                continue;
            }
            if out.contains(&k) {
                continue;
            }
            out.push(k);
        }
        Self { keywords: out }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Empty keyword list means every item passes.
    pub fn is_match_all(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords contained in `text`, in keyword-list order.
    pub fn matches(&self, text: &str) -> Vec<&str> {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Tags to attach to `text`, or `None` when it should not be notified.
    pub fn tags_for(&self, text: &str) -> Option<Vec<&str>> {
        if self.is_match_all() {
            return Some(vec![MATCH_ALL_TAG]);
        }
        let matched = self.matches(text);
        if matched.is_empty() {
            None
        } else {
            Some(matched)
        }
    }
}

/// Upper-case the first character only; the rest is left as is.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `[" object detection ", " cnn "]` renders as `#Object detection #Cnn`.
pub fn render_tags<S: AsRef<str>>(matched: &[S]) -> String {
    matched
        .iter()
        .map(|k| format!("#{}", capitalize(k.as_ref().trim())))
        .collect::<Vec<_>>()
        .join(" ")
}
