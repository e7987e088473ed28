//! Dataset identity: slug canonicalization and dataset file naming.
//!
//! New files are always written as `<family>_<slug>.json` where the slug is
//! lowercase alphanumeric words joined by `_`. Older datasets used either
//! `_` or `-` for both the family separator and the word separator, so
//! lookups also accept those four spellings derived from the display name.

use serde::{Deserialize, Serialize};

/// Canonical separator used when writing.
pub const SEPARATOR: char = '_';

/// Canonicalize a display name: lowercase, every run of non-alphanumeric
/// characters collapses to a single `_`, no leading or trailing separator.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Turn a file stem such as `sri_lanka` or `sri-lanka` into `Sri Lanka`.
pub fn display_name(stem: &str) -> String {
    let spaced = stem.replace(&['_', '-'][..], " ");
    title_case(spaced.trim())
}

/// Uppercase the first letter of each word, lowercase the rest.
/// A word starts after any non-alphabetic character.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// The three file families that make up a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFamily {
    Country,
    Locations,
    Ratings,
}

impl FileFamily {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Locations => "locations",
            Self::Ratings => "ratings",
        }
    }
}

impl std::fmt::Display for FileFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Identity of a dataset (country profile + locations + optional ratings).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId {
    /// Name as shown to the user, e.g. `Sri Lanka` or `Ella hiking`.
    pub display: String,
    /// Canonical slug, e.g. `sri_lanka`.
    pub slug: String,
}

impl DatasetId {
    /// Identity for a name picked from the dataset listing.
    pub fn from_display(name: &str) -> Self {
        let display = name.trim().to_string();
        Self {
            slug: slugify(&display),
            display,
        }
    }

    /// Identity of a freshly generated dataset: location and keyword.
    pub fn for_generation(location: &str, keyword: &str) -> Self {
        Self::from_display(&format!("{} {}", location.trim(), keyword.trim()))
    }

    pub fn is_empty(&self) -> bool {
        self.slug.is_empty()
    }

    /// The spelling new files are written under.
    pub fn file_name(&self, family: FileFamily) -> String {
        format!("{}{}{}.json", family.prefix(), SEPARATOR, self.slug)
    }

    /// All spellings accepted when reading, canonical first.
    ///
    /// Legacy spellings lowercase the display name and replace spaces with
    /// `_` or `-`, combined with either family separator.
    pub fn candidate_file_names(&self, family: FileFamily) -> Vec<String> {
        let base = self.display.to_lowercase();
        let base = base.trim();
        let underscored = base.replace(' ', "_");
        let hyphenated = base.replace(' ', "-");

        let mut names = vec![self.file_name(family)];
        let legacy = [
            ('_', &underscored),
            ('-', &hyphenated),
            ('_', &hyphenated),
            ('-', &underscored),
        ];
        for (sep, body) in legacy {
            let name = format!("{}{}{}.json", family.prefix(), sep, body);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}
