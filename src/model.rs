use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Package,  // single package page (packages.debian.org / packages.ubuntu.com)
    Versions, // madison version table
    ArchRepo, // archlinux.org repository search
    Aur,      // AUR RPC search
    Search,   // Debian/Ubuntu site search
    Mint,     // Linux Mint package list
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    #[default]
    None,
    Depends,
    Recommends,
    Suggests,
}

impl RelationKind {
    /// Keyword the package pages print in front of each relation entry.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Depends => Some("dep"),
            Self::Recommends => Some("rec"),
            Self::Suggests => Some("sug"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Depends => "depends",
            Self::Recommends => "recommends",
            Self::Suggests => "suggests",
        }
    }

    /// `dep:` and `pre-dep:` both count as depends.
    pub fn matches(&self, keyword: &str) -> bool {
        self.keyword().is_some_and(|k| keyword.contains(k))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageQuery {
    pub kind: QueryKind,
    pub name: String, // always lowercase
    pub release: Option<String>,
    pub use_source: bool,
    pub reverse: bool,
    pub exact: bool,
    pub relation: RelationKind,
    pub verbose: bool,
}

impl PackageQuery {
    pub fn new(kind: QueryKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into().to_lowercase(),
            release: None,
            use_source: false,
            reverse: false,
            exact: false,
            relation: RelationKind::None,
            verbose: false,
        }
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    pub fn with_source(mut self, use_source: bool) -> Self {
        self.use_source = use_source;
        self
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn with_relation(mut self, relation: RelationKind) -> Self {
        self.relation = relation;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawFormat {
    Tabular,
    HtmlPage,
    Json,
    HtmlTable,
}

impl fmt::Display for RawFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabular => write!(f, "tabular"),
            Self::HtmlPage => write!(f, "html-page"),
            Self::Json => write!(f, "json"),
            Self::HtmlTable => write!(f, "html-table"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub format: RawFormat,
}

impl RawResponse {
    pub fn new(format: RawFormat, body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            content_type: None,
            format,
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Architecture tags in insertion order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchSet(Vec<String>);

impl ArchSet {
    pub fn insert(&mut self, arch: impl Into<String>) -> bool {
        let arch = arch.into();
        if arch.is_empty() || self.0.contains(&arch) {
            return false;
        }
        self.0.push(arch);
        true
    }

    pub fn union(&mut self, other: &ArchSet) {
        for arch in &other.0 {
            self.insert(arch.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl<S: Into<String>> FromIterator<S> for ArchSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ArchSet::default();
        for arch in iter {
            set.insert(arch);
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String, // upstream string, never parsed
    pub archs: ArchSet,
    pub release: Option<String>,
    pub section: Option<String>,
    pub description: Option<String>,
    pub extra: BTreeMap<String, String>, // e.g. AUR "ID" / "Votes"
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            archs: ArchSet::default(),
            release: None,
            section: None,
            description: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_archs<I, S>(mut self, archs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arch in archs {
            self.archs.insert(arch);
        }
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGroup {
    pub alternatives: Vec<String>,
}

impl DependencyGroup {
    pub fn new(first: impl Into<String>) -> Self {
        Self {
            alternatives: vec![first.into()],
        }
    }

    pub fn push(&mut self, alternative: impl Into<String>) {
        self.alternatives.push(alternative.into());
    }
}

/// How package entries are rendered by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryStyle {
    Versions { by_source: bool },
    PackageDetail,
    ArchRepo,
    Aur,
    Mint,
    SearchHit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Entries {
    Packages {
        style: EntryStyle,
        records: Vec<PackageRecord>,
    },
    Dependencies {
        package: String,
        relation: RelationKind,
        groups: Vec<DependencyGroup>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    pub entries: Entries,
    /// Cardinality before any truncation; never below `len()`.
    pub total_count: usize,
    pub view_more: Option<String>,
}

impl ResultSet {
    pub fn packages(style: EntryStyle, records: Vec<PackageRecord>) -> Self {
        let total_count = records.len();
        Self {
            entries: Entries::Packages { style, records },
            total_count,
            view_more: None,
        }
    }

    pub fn dependencies(
        package: impl Into<String>,
        relation: RelationKind,
        groups: Vec<DependencyGroup>,
    ) -> Self {
        let total_count = groups.len();
        Self {
            entries: Entries::Dependencies {
                package: package.into(),
                relation,
                groups,
            },
            total_count,
            view_more: None,
        }
    }

    /// Raises the reported total; a value below the carried length is ignored.
    pub fn with_total(mut self, total: usize) -> Self {
        self.total_count = total.max(self.len());
        self
    }

    pub fn with_view_more(mut self, url: Option<String>) -> Self {
        self.view_more = url;
        self
    }

    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::Packages { records, .. } => records.len(),
            Entries::Dependencies { groups, .. } => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> &[PackageRecord] {
        match &self.entries {
            Entries::Packages { records, .. } => records,
            Entries::Dependencies { .. } => &[],
        }
    }
}
