//! Task extraction: turns free-text task descriptions into [`TaskFacts`].

use std::collections::{BTreeSet, HashSet};
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::alias::{AliasResolver, CanonicalName};

/// Longest run of words tried against the alias table.
const MAX_ALIAS_WORDS: usize = 4;

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9]+(?:[-_][A-Za-z0-9]+)*").expect("Invalid regex pattern for words")
});

static CAMEL_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z0-9]+(?:[A-Z][a-z0-9]+)+\b")
        .expect("Invalid regex pattern for CamelCase")
});

static SNAKE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[a-z][a-z0-9]*(?:_[a-z0-9]+)+\b").expect("Invalid regex pattern for snake_case")
});

static TITLE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z0-9]+(?:[ \t]+[A-Z][A-Za-z0-9]+)+\b")
        .expect("Invalid regex pattern for title phrases")
});

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["“`]([^"”`\n]{2,60})["”`]"#)
        .expect("Invalid regex pattern for quoted names")
});

static LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:component|service|module)[:\s]+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid regex pattern for labelled components")
});

static ARROW_FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*(?:->|→|=>)\s*([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid regex pattern for arrow flows")
});

static FROM_TO_FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfrom\s+([A-Za-z_][A-Za-z0-9_]*)\s+to\s+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid regex pattern for from/to flows")
});

static BARE_TO_FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Za-z_][A-Za-z0-9_]*)\s+to\s+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid regex pattern for bare to flows")
});

static SENDS_FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b([A-Za-z_][A-Za-z0-9_]*)\s+",
        r"(?:sends?|emits?|publish(?:es)?|streams?|writes?)\s+",
        r"[^.;]*?\b(?:to|into)\s+([A-Za-z_][A-Za-z0-9_]*)",
    ))
    .expect("Invalid regex pattern for verb flows")
});

static PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z][a-z0-9]*(?:-[a-z0-9]+)*-(?:sdk|client|api|py|js|rs)\b")
        .expect("Invalid regex pattern for package names")
});

/// Dependencies recognised by name alone.
const KNOWN_DEPENDENCIES: &[&str] = &[
    "numpy", "pandas", "flask", "fastapi", "django", "sqlalchemy", "redis", "kafka",
    "postgresql", "mongodb", "react", "nextjs", "typescript", "tailwind", "websocket",
    "anthropic", "openai", "hume", "zoom", "rtms", "claude",
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can",
    "need", "implement", "create", "add", "update", "fix", "build", "make", "component",
    "feature", "system", "module", "function", "method", "service", "into", "that", "this",
    "wire", "refactor", "extend", "integrate", "route", "move", "emit", "connect", "support",
    "enable", "remove", "rename", "improve", "write", "use", "ensure", "allow", "send", "stream",
    "next", "up", "back", "due", "how", "what", "way", "order", "able", "going", "want",
];

/// A component name referenced by the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskComponent {
    /// The name as written in the task.
    pub surface: String,
    /// Its canonical identity.
    pub canonical: CanonicalName,
}

/// A data flow referenced by the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFlow {
    /// Producing end, as written.
    pub from: String,
    /// Consuming end, as written.
    pub to: String,
}

impl std::fmt::Display for TaskFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Normalized facts extracted once from the task text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaskFacts {
    /// The original task text.
    pub task: String,
    /// Referenced components, one per canonical identity, in order of appearance.
    pub components: Vec<TaskComponent>,
    /// Referenced data flows.
    pub flows: Vec<TaskFlow>,
    /// Referenced dependency names, lowercase.
    pub dependencies: Vec<String>,
    /// Search keywords for relevance filtering.
    pub keywords: BTreeSet<String>,
}

impl TaskFacts {
    /// Returns `true` if the task references a component with this canonical name.
    #[must_use]
    pub fn mentions(&self, canonical: &CanonicalName) -> bool {
        self.components.iter().any(|c| &c.canonical == canonical)
    }
}

/// Extracts components, flows, dependencies and keywords from a task description.
#[must_use]
pub fn extract(task: &str, aliases: &AliasResolver) -> TaskFacts {
    TaskFacts {
        task: task.to_string(),
        components: extract_components(task, aliases),
        flows: extract_flows(task),
        dependencies: extract_dependencies(task),
        keywords: extract_keywords(task),
    }
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word.to_lowercase().as_str())
}

fn overlaps(span: &Range<usize>, covered: &[Range<usize>]) -> bool {
    covered.iter().any(|c| span.start < c.end && c.start < span.end)
}

fn extract_components(task: &str, aliases: &AliasResolver) -> Vec<TaskComponent> {
    let mut found: Vec<TaskComponent> = Vec::new();
    let mut seen: HashSet<CanonicalName> = HashSet::new();
    let mut push = |surface: &str| {
        let canonical = aliases.resolve(surface);
        if !canonical.as_str().is_empty() && seen.insert(canonical.clone()) {
            found.push(TaskComponent { surface: surface.to_string(), canonical });
        }
    };

    // Known aliases first, longest window wins.
    let words: Vec<_> = WORD.find_iter(task).collect();
    let mut covered: Vec<Range<usize>> = Vec::new();
    let mut hits: Vec<Range<usize>> = Vec::new();
    for len in (1..=MAX_ALIAS_WORDS).rev() {
        for window in words.windows(len) {
            let span = window[0].start()..window[len - 1].end();
            if overlaps(&span, &covered) {
                continue;
            }
            let joined: String = window.iter().map(regex::Match::as_str).collect();
            if aliases.known(&joined).is_some() && !(len == 1 && is_stop_word(&joined)) {
                covered.push(span.clone());
                hits.push(span);
            }
        }
    }
    hits.sort_by_key(|r| r.start);

    let mut candidates: Vec<(usize, String)> =
        hits.iter().map(|span| (span.start, task[span.clone()].to_string())).collect();

    let mut identifiers: Vec<Range<usize>> = Vec::new();
    for m in CAMEL_CASE.find_iter(task).chain(SNAKE_CASE.find_iter(task)) {
        if !overlaps(&m.range(), &covered) {
            candidates.push((m.start(), m.as_str().to_string()));
            identifiers.push(m.range());
        }
    }
    covered.extend(identifiers);

    for m in TITLE_PHRASE.find_iter(task) {
        if overlaps(&m.range(), &covered) {
            continue;
        }
        let phrase: Vec<&str> =
            m.as_str().split_whitespace().skip_while(|w| is_stop_word(w)).collect();
        if phrase.len() >= 2 {
            candidates.push((m.start(), phrase.join(" ")));
        }
    }

    for caps in QUOTED.captures_iter(task).chain(LABELLED.captures_iter(task)) {
        if let Some(m) = caps.get(1) {
            let name = m.as_str().trim();
            if !name.is_empty() && !is_stop_word(name) && !overlaps(&m.range(), &covered) {
                candidates.push((m.start(), name.to_string()));
            }
        }
    }

    candidates.sort_by_key(|(start, _)| *start);
    for (_, surface) in &candidates {
        push(surface);
    }
    found
}

fn extract_flows(task: &str) -> Vec<TaskFlow> {
    let mut flows: Vec<TaskFlow> = Vec::new();
    for pattern in [&*ARROW_FLOW, &*FROM_TO_FLOW, &*SENDS_FLOW, &*BARE_TO_FLOW] {
        for caps in pattern.captures_iter(task) {
            let (Some(from), Some(to)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let (from, to) = (from.as_str(), to.as_str());
            if is_stop_word(from) || is_stop_word(to) {
                continue;
            }
            let flow = TaskFlow { from: from.to_string(), to: to.to_string() };
            if !flows.contains(&flow) {
                flows.push(flow);
            }
        }
    }
    flows
}

fn extract_dependencies(task: &str) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();
    for m in PACKAGE.find_iter(task) {
        let name = m.as_str().to_lowercase();
        if !deps.contains(&name) {
            deps.push(name);
        }
    }

    // Scan the remaining text so "hume-sdk" is not also reported as "hume".
    let remainder = PACKAGE.replace_all(task, " ");
    for word in WORD.find_iter(&remainder) {
        let lower = word.as_str().to_lowercase();
        if KNOWN_DEPENDENCIES.contains(&lower.as_str()) && !deps.contains(&lower) {
            deps.push(lower);
        }
    }
    deps
}

fn extract_keywords(task: &str) -> BTreeSet<String> {
    let mut keywords: BTreeSet<String> = WORD
        .find_iter(task)
        .flat_map(|m| m.as_str().split(['-', '_']).map(str::to_lowercase).collect::<Vec<_>>())
        .filter(|w| w.len() > 2 && !is_stop_word(w))
        .collect();
    for m in CAMEL_CASE.find_iter(task) {
        keywords.insert(m.as_str().to_lowercase());
    }
    keywords
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::alias::AliasTable;

    fn resolver() -> AliasResolver {
        let mut components = BTreeMap::new();
        components.insert(
            "flashpoint_detector".to_string(),
            vec!["Flashpoint Detector".into(), "FlashpointEvent".into()],
        );
        components.insert("nudge_timing".to_string(), vec!["Nudge Timing".into()]);
        AliasResolver::new(&AliasTable { components, out_of_scope: vec![] })
    }

    fn surfaces(facts: &TaskFacts) -> Vec<&str> {
        facts.components.iter().map(|c| c.surface.as_str()).collect()
    }

    #[test]
    fn finds_known_alias_phrase() {
        let facts = extract("Wire the Flashpoint Detector into the timeline", &resolver());
        assert_eq!(facts.components.len(), 1);
        assert_eq!(facts.components[0].surface, "Flashpoint Detector");
        assert_eq!(facts.components[0].canonical.as_str(), "flashpointdetector");
    }

    #[test]
    fn aliases_collapse_to_one_component() {
        let facts =
            extract("Emit FlashpointEvent from the Flashpoint Detector", &resolver());
        assert_eq!(facts.components.len(), 1);
    }

    #[test]
    fn finds_camel_and_snake_case_names() {
        let facts = extract("Refactor ToneShiftDetector and safety_core", &resolver());
        assert_eq!(surfaces(&facts), vec!["ToneShiftDetector", "safety_core"]);
    }

    #[test]
    fn title_phrase_drops_leading_verb() {
        let facts = extract("Implement Dissent Language Pattern Matcher", &resolver());
        assert_eq!(surfaces(&facts), vec!["Dissent Language Pattern Matcher"]);
    }

    #[test]
    fn labelled_and_quoted_names() {
        let facts = extract("Extend service: ingest and \"audit trail\" logging", &resolver());
        assert_eq!(surfaces(&facts), vec!["ingest", "audit trail"]);
    }

    #[test]
    fn extracts_arrow_and_prose_flows() {
        let facts = extract("Route ingest -> storage, and from parser to validator", &resolver());
        let flows: Vec<String> = facts.flows.iter().map(ToString::to_string).collect();
        assert_eq!(flows, vec!["ingest -> storage", "parser -> validator"]);
    }

    #[test]
    fn bare_to_between_names_is_a_flow() {
        let facts = extract("Pipe audio to timeline", &resolver());
        let flows: Vec<String> = facts.flows.iter().map(ToString::to_string).collect();
        assert_eq!(flows, vec!["audio -> timeline"]);

        let facts = extract("Add ToneShiftDetector next to the dashboard", &resolver());
        assert!(facts.flows.is_empty());
    }

    #[test]
    fn flows_with_stop_word_endpoints_are_dropped() {
        let facts = extract("Move from the old to the new layout", &resolver());
        assert!(facts.flows.is_empty());
    }

    #[test]
    fn package_names_are_not_double_counted() {
        let facts = extract("Integrate hume-sdk for prosody and store in redis", &resolver());
        assert_eq!(facts.dependencies, vec!["hume-sdk", "redis"]);
    }

    #[test]
    fn keywords_skip_stop_words() {
        let facts = extract("Add the nudge cooldown", &resolver());
        assert!(facts.keywords.contains("nudge"));
        assert!(facts.keywords.contains("cooldown"));
        assert!(!facts.keywords.contains("the"));
        assert!(!facts.keywords.contains("add"));
    }

    #[test]
    fn empty_task_has_no_facts() {
        let facts = extract("", &resolver());
        assert!(facts.components.is_empty());
        assert!(facts.flows.is_empty());
        assert!(facts.dependencies.is_empty());
    }
}
