//! Cross-source coherence: do the sources agree with each other?
//!
//! Every bundle makes claims about entities (a name, a boundary, a status).
//! Two claims from different sources are about the same entity when they
//! share a canonical key. Disagreement between such claims is a conflict
//! naming both sources; an entity missing from one source is not.
//!
//! Claims are compared for every unordered pair of sources, and each conflict
//! lists its sources in report order, so the outcome does not depend on which
//! bundle is read first.

use std::collections::{BTreeMap, BTreeSet};

use crate::alias::{AliasResolver, CanonicalName};
use crate::bundle::requirements::non_blank;
use crate::bundle::ContextBundles;
use crate::model::{CheckResult, Evidence, Finding, FindingKind, SourceKind};

/// Number of shared names listed in the naming-consistency match.
const MAX_SHARED_NAMES: usize = 5;

/// An attribute one source asserts about an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Attribute {
    Name,
    Boundary,
    Status,
}

impl Attribute {
    const ALL: [Self; 3] = [Self::Name, Self::Boundary, Self::Status];

    fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Boundary => "boundary",
            Self::Status => "status",
        }
    }
}

#[derive(Debug)]
struct Claim<'a> {
    source: SourceKind,
    keys: Vec<CanonicalName>,
    name: Option<&'a str>,
    boundary: Option<&'a str>,
    status: Option<&'a str>,
}

impl<'a> Claim<'a> {
    fn new(source: SourceKind, aliases: &AliasResolver, ids: &[Option<&str>]) -> Self {
        let mut keys: Vec<CanonicalName> = Vec::new();
        for id in ids.iter().flatten() {
            let key = aliases.resolve(id);
            if !key.as_str().is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self { source, keys, name: None, boundary: None, status: None }
    }

    fn named(mut self, name: Option<&'a str>) -> Self {
        self.name = non_blank(name);
        self
    }

    fn bounded(mut self, boundary: Option<&'a str>, status: Option<&'a str>) -> Self {
        self.boundary = non_blank(boundary);
        self.status = non_blank(status);
        self
    }

    fn get(&self, attribute: Attribute) -> Option<&'a str> {
        match attribute {
            Attribute::Name => self.name,
            Attribute::Boundary => self.boundary,
            Attribute::Status => self.status,
        }
    }

    /// The smallest key both claims share, so the pick is order-independent.
    fn shared_key(&self, other: &Claim<'_>) -> Option<&CanonicalName> {
        self.keys.iter().filter(|k| other.keys.contains(k)).min()
    }
}

fn collect_claims<'a>(
    bundles: &'a ContextBundles,
    aliases: &AliasResolver,
    sources: &[SourceKind],
) -> Vec<Claim<'a>> {
    let mut claims = Vec::new();
    if sources.contains(&SourceKind::Blueprint) {
        for (c, _) in bundles.blueprint.components() {
            let ids = [Some(c.id.as_str()), c.name.as_deref()];
            claims.push(
                Claim::new(SourceKind::Blueprint, aliases, &ids)
                    .named(c.name.as_deref())
                    .bounded(c.boundary.as_deref(), c.status.as_deref()),
            );
        }
    }
    // Codebase symbols are identifiers, not labels, so they assert no attributes.
    if sources.contains(&SourceKind::Roadmap) {
        let roadmap = &bundles.roadmap;
        for c in &roadmap.components {
            let ids = [Some(c.id.as_str()), Some(c.name.as_str())];
            claims.push(
                Claim::new(SourceKind::Roadmap, aliases, &ids)
                    .named(Some(c.name.as_str()))
                    .bounded(c.boundary.as_deref(), c.status.as_deref()),
            );
        }
        for m in &roadmap.matches {
            claims.push(
                Claim::new(
                    SourceKind::Roadmap,
                    aliases,
                    &[Some(m.component_id.as_str()), Some(m.component_name.as_str())],
                )
                .named(Some(m.component_name.as_str()))
                .bounded(None, m.status.as_deref()),
            );
        }
    }
    if sources.contains(&SourceKind::Requirements) {
        for s in &bundles.requirements.scope {
            let ids = [s.id.as_deref(), Some(s.name.as_str())];
            claims.push(
                Claim::new(SourceKind::Requirements, aliases, &ids)
                    .named(Some(s.name.as_str()))
                    .bounded(s.boundary.as_deref(), s.status.as_deref()),
            );
        }
    }
    claims
}

/// Attribute values compare after lowercasing and collapsing whitespace.
fn same_text(a: &str, b: &str) -> bool {
    let squash = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    squash(a) == squash(b)
}

/// A name agrees when it is equivalent to the other name or is one of the
/// other claim's identifiers.
fn names_agree(left: &Claim<'_>, right: &Claim<'_>, aliases: &AliasResolver) -> bool {
    let (Some(a), Some(b)) = (left.name, right.name) else {
        return true;
    };
    aliases.equivalent(a, b)
        || right.keys.contains(&aliases.resolve(a))
        || left.keys.contains(&aliases.resolve(b))
}

fn disagrees(
    attribute: Attribute,
    left: &Claim<'_>,
    right: &Claim<'_>,
    aliases: &AliasResolver,
) -> bool {
    match (attribute, left.get(attribute), right.get(attribute)) {
        (_, None, _) | (_, _, None) => false,
        (Attribute::Name, Some(_), Some(_)) => !names_agree(left, right, aliases),
        (Attribute::Boundary | Attribute::Status, Some(a), Some(b)) => !same_text(a, b),
    }
}

/// Key identifying one disagreement regardless of which claim came first.
type ConflictKey = (CanonicalName, Attribute, SourceKind, SourceKind, String, String);

fn find_conflicts(claims: &[Claim<'_>], aliases: &AliasResolver) -> Vec<Finding> {
    let mut found: BTreeMap<ConflictKey, Finding> = BTreeMap::new();

    for (i, a) in claims.iter().enumerate() {
        for b in &claims[i + 1..] {
            if a.source == b.source {
                continue;
            }
            let Some(subject) = a.shared_key(b) else {
                continue;
            };
            let (left, right) = if a.source < b.source { (a, b) } else { (b, a) };
            for attribute in Attribute::ALL {
                let (Some(lv), Some(rv)) = (left.get(attribute), right.get(attribute)) else {
                    continue;
                };
                if !disagrees(attribute, left, right, aliases) {
                    continue;
                }
                let key = (
                    subject.clone(),
                    attribute,
                    left.source,
                    right.source,
                    lv.to_lowercase(),
                    rv.to_lowercase(),
                );
                found.entry(key).or_insert_with(|| {
                    Finding::new(
                        FindingKind::Conflict,
                        format!(
                            "{} and {} disagree on {} of '{subject}': '{lv}' vs '{rv}'",
                            left.source,
                            right.source,
                            attribute.label()
                        ),
                    )
                    .about(subject.clone())
                    .citing(Evidence::Disagreement {
                        attribute: attribute.label().to_string(),
                        left: (left.source, lv.to_string()),
                        right: (right.source, rv.to_string()),
                    })
                });
            }
        }
    }
    found.into_values().collect()
}

fn has_data(bundles: &ContextBundles, source: SourceKind) -> bool {
    match source {
        SourceKind::Blueprint => !bundles.blueprint.is_empty(),
        SourceKind::Codebase => !bundles.codebase.is_empty(),
        SourceKind::Roadmap => !bundles.roadmap.is_empty(),
        SourceKind::Requirements => !bundles.requirements.is_empty(),
        SourceKind::Coherence => false,
    }
}

fn has_acceptance(bundles: &ContextBundles) -> bool {
    let requirements = &bundles.requirements;
    requirements.acceptance().is_some()
        || requirements.scope.iter().any(|s| non_blank(s.acceptance_criterion.as_deref()).is_some())
}

/// Checks whether the selected sources agree with each other.
///
/// `sources` lists the per-source checks that ran; bundles of other sources
/// are ignored.
#[must_use]
pub fn check_coherence(
    bundles: &ContextBundles,
    aliases: &AliasResolver,
    sources: &[SourceKind],
) -> CheckResult {
    let mut result = CheckResult::new(SourceKind::Coherence);
    let sources: Vec<SourceKind> =
        sources.iter().copied().filter(|s| *s != SourceKind::Coherence).collect();

    let with_data = sources.iter().filter(|s| has_data(bundles, **s)).count();
    result.add_match(format!("Data found in {with_data}/{} sources", sources.len()));
    if with_data < 2 {
        result.add_warning("Limited cross-source validation possible");
    }

    let claims = collect_claims(bundles, aliases, &sources);
    for conflict in find_conflicts(&claims, aliases) {
        result.push(conflict);
    }

    if sources.contains(&SourceKind::Blueprint) && sources.contains(&SourceKind::Codebase) {
        let designed: BTreeSet<CanonicalName> = bundles
            .blueprint
            .components()
            .flat_map(|(c, _)| {
                std::iter::once(aliases.resolve(&c.id))
                    .chain(c.name.as_deref().map(|n| aliases.resolve(n)))
            })
            .collect();
        let built: BTreeSet<CanonicalName> =
            bundles.codebase.symbols().map(|s| aliases.resolve(s)).collect();
        if !designed.is_empty() && !built.is_empty() {
            let shared: Vec<&str> = designed
                .intersection(&built)
                .take(MAX_SHARED_NAMES)
                .map(CanonicalName::as_str)
                .collect();
            if shared.is_empty() {
                result.add_warning("No direct naming overlap between blueprint and code");
            } else {
                result.add_match(format!("Naming consistent: {}", shared.join(", ")));
            }
        }
    }

    if sources.contains(&SourceKind::Roadmap) && sources.contains(&SourceKind::Requirements) {
        let tracked = !bundles.roadmap.matches.is_empty();
        match (tracked, has_acceptance(bundles)) {
            (true, true) => {
                result.add_match("Both roadmap entry and requirements found, good traceability");
            }
            (true, false) => result.add_warning("In roadmap but missing acceptance criteria"),
            (false, true) => result.add_warning("Has requirements but not tracked in roadmap"),
            (false, false) => {}
        }
    }

    tracing::debug!(conflicts = result.conflicts.len(), "coherence check finished");
    result
}
