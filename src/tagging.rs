//! Keyword-heuristic topical tagging for ingested documents.
//!
//! Tags drive the document-level scope filter: a query can be restricted to
//! documents carrying any of a set of selected tags. Tagging happens once at
//! ingestion, from the file name plus a sample of the extracted text.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The controlled vocabulary of topical labels.
///
/// Serialized forms match the display labels (`"Ops Manual"`, `"HACCP"`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    Recipe,
    #[serde(rename = "Ops Manual")]
    OpsManual,
    #[serde(rename = "HACCP")]
    Haccp,
    Training,
    #[serde(rename = "LTO")]
    Lto,
    Equipment,
    Vendors,
    #[serde(rename = "HR")]
    Hr,
    Forms,
}

impl Tag {
    /// Every tag, in display order.
    pub const ALL: [Tag; 9] = [
        Tag::Recipe,
        Tag::OpsManual,
        Tag::Haccp,
        Tag::Training,
        Tag::Lto,
        Tag::Equipment,
        Tag::Vendors,
        Tag::Hr,
        Tag::Forms,
    ];

    /// The label shown in filters and document listings.
    pub fn label(self) -> &'static str {
        match self {
            Tag::Recipe => "Recipe",
            Tag::OpsManual => "Ops Manual",
            Tag::Haccp => "HACCP",
            Tag::Training => "Training",
            Tag::Lto => "LTO",
            Tag::Equipment => "Equipment",
            Tag::Vendors => "Vendors",
            Tag::Hr => "HR",
            Tag::Forms => "Forms",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trigger terms per tag, matched as lowercase substrings anywhere in the
/// combined name-plus-sample string. `temperatur` and `sanitiz` are prefixes
/// covering their inflections. Short terms like `hr` and `par` match inside
/// larger words as well; scope filtering tolerates the occasional extra tag.
const TRIGGERS: &[(&[&str], Tag)] = &[
    (&["recipe", "prep", "yield", "ingredients", "portion"], Tag::Recipe),
    (&["manual", "operations", "ops", "sop", "procedure", "standard"], Tag::OpsManual),
    (&["haccp", "food safety", "ccp", "temperatur", "sanitiz", "cooling", "holding"], Tag::Haccp),
    (&["training", "onboarding", "handbook", "guide", "curriculum"], Tag::Training),
    (&["lto", "limited time", "promo", "promotion", "campaign"], Tag::Lto),
    (&["oven", "refrigerator", "equipment", "slicer", "dishwasher", "hood"], Tag::Equipment),
    (&["vendor", "ordering", "order", "supplier", "invoice", "par"], Tag::Vendors),
    (&["hr", "human resources", "hiring", "benefit", "policy"], Tag::Hr),
    (&["form", "checklist", "log", "template"], Tag::Forms),
];

/// How much of the document body feeds the tag heuristics.
const SAMPLE_LEN: usize = 1000;

/// Infer topical tags from a document's name and leading content.
///
/// Builds a lowercase search string from `name` plus the first 1000
/// characters of `text` and adds every tag with a trigger term occurring
/// anywhere in it. Falls back to [`Tag::OpsManual`] when nothing matches;
/// the result is never empty.
pub fn auto_tags(name: &str, text: &str) -> BTreeSet<Tag> {
    let sample: String = text.chars().take(SAMPLE_LEN).collect();
    let haystack = format!("{name}\n{sample}").to_lowercase();

    let mut tags = BTreeSet::new();
    for (terms, tag) in TRIGGERS {
        if terms.iter().any(|term| haystack.contains(term)) {
            tags.insert(*tag);
        }
    }
    if tags.is_empty() {
        tags.insert(Tag::OpsManual);
    }
    tags
}
