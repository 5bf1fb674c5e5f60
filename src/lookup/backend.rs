//! Backend selection.
//!
//! A [`Backend`] names one upstream and knows how to address it: the request
//! URL for a query, the raw format the response is declared as, the "view
//! more" link shown with the summary, and which adapter parses the payload.

use crate::config::{Endpoints, LookupConfig};
use crate::lookup::classify::{classify, distro_from_name, Distro};
use crate::lookup::formats::{arch, aur, madison, mint, package_page, search_page};
use crate::model::{PackageQuery, QueryKind, RawFormat, RawResponse, ResultSet};
use crate::traits::LookupError;
use std::fmt;
use urlencoding::encode;

/// Archive table queried on madison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MadisonTable {
    Debian,
    Ubuntu,
    Derivatives,
    All,
}

impl MadisonTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Ubuntu => "ubuntu",
            Self::Derivatives => "derivatives",
            Self::All => "all",
        }
    }

    /// Archive table names first, then release codenames.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "debian" => Some(Self::Debian),
            "ubuntu" => Some(Self::Ubuntu),
            "derivatives" => Some(Self::Derivatives),
            "all" => Some(Self::All),
            other => classify(other).map(Self::from),
        }
    }

    /// Package site of the table, if it has one.
    fn distro(&self) -> Option<Distro> {
        match self {
            Self::Debian => Some(Distro::Debian),
            Self::Ubuntu => Some(Distro::Ubuntu),
            Self::Derivatives | Self::All => None,
        }
    }
}

impl From<Distro> for MadisonTable {
    fn from(distro: Distro) -> Self {
        match distro {
            Distro::Debian => Self::Debian,
            Distro::Ubuntu => Self::Ubuntu,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Madison(MadisonTable),
    PackagePage(Distro),
    SearchPage(Distro),
    ArchRepo,
    Aur,
    Mint,
}

impl Backend {
    /// Picks the upstream serving `query`.
    pub fn select(query: &PackageQuery) -> Result<Self, LookupError> {
        let release = query.release.as_deref().unwrap_or_default();
        let unknown = || LookupError::UnknownDistribution(release.to_string());

        match query.kind {
            QueryKind::Package => classify(release).map(Self::PackagePage).ok_or_else(unknown),
            QueryKind::Versions => MadisonTable::from_token(release)
                .map(Self::Madison)
                .ok_or_else(unknown),
            QueryKind::Search => distro_from_name(release)
                .map(Self::SearchPage)
                .ok_or_else(unknown),
            QueryKind::ArchRepo => Ok(Self::ArchRepo),
            QueryKind::Aur => Ok(Self::Aur),
            QueryKind::Mint if release.trim().is_empty() => Err(unknown()),
            QueryKind::Mint => Ok(Self::Mint),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Madison(_) => "madison",
            Self::PackagePage(_) => "package-page",
            Self::SearchPage(_) => "search-page",
            Self::ArchRepo => "arch",
            Self::Aur => "aur",
            Self::Mint => "mint",
        }
    }

    pub fn raw_format(&self) -> RawFormat {
        match self {
            Self::Madison(_) => RawFormat::Tabular,
            Self::PackagePage(_) | Self::SearchPage(_) => RawFormat::HtmlPage,
            Self::ArchRepo | Self::Aur => RawFormat::Json,
            Self::Mint => RawFormat::HtmlTable,
        }
    }

    pub fn request_url(&self, query: &PackageQuery, config: &LookupConfig) -> String {
        let endpoints = &config.endpoints;
        let name = encode(&query.name);
        let release = query.release.as_deref().unwrap_or_default().to_lowercase();

        match self {
            Self::Madison(table) => {
                let mut url = format!(
                    "{}?text=on&package={}&table={}&a={}&c=&s=",
                    endpoints.madison,
                    name,
                    table.as_str(),
                    encode(&madison::arch_filter(&config.archs))
                );
                if query.use_source {
                    url.push_str("&S=on");
                }
                url
            }
            Self::PackagePage(distro) => format!(
                "{}{}/{}",
                site(endpoints, *distro),
                encode(&release),
                name
            ),
            Self::SearchPage(distro) => search_url(endpoints, *distro, &query.name),
            Self::ArchRepo => {
                let param = if query.exact { "name" } else { "q" };
                format!("{}?{}={}", endpoints.arch, param, name)
            }
            Self::Aur => format!("{}?v=5&type=search&arg={}", endpoints.aur, name),
            Self::Mint => format!("{}?release={}", endpoints.mint, encode(&release)),
        }
    }

    /// Link shown after the summary for further browsing.
    pub fn view_more(&self, query: &PackageQuery, config: &LookupConfig) -> Option<String> {
        match self {
            Self::Madison(table) => table
                .distro()
                .map(|distro| search_url(&config.endpoints, distro, &query.name)),
            Self::PackagePage(_) | Self::SearchPage(_) | Self::Mint => {
                Some(self.request_url(query, config))
            }
            Self::ArchRepo | Self::Aur => None,
        }
    }

    pub fn parse(&self, raw: &RawResponse, query: &PackageQuery) -> Result<ResultSet, LookupError> {
        match self {
            Self::Madison(_) => madison::parse(raw, query),
            Self::PackagePage(_) => package_page::parse(raw, query),
            Self::SearchPage(distro) => search_page::parse(raw, query, *distro),
            Self::ArchRepo => arch::parse(raw, query),
            Self::Aur => aur::parse(raw, query),
            Self::Mint => mint::parse(raw, query),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Madison(table) => write!(f, "madison ({})", table.as_str()),
            Self::PackagePage(distro) => write!(f, "{} package page", distro),
            Self::SearchPage(distro) => write!(f, "{} search", distro),
            other => write!(f, "{}", other.id()),
        }
    }
}

fn site(endpoints: &Endpoints, distro: Distro) -> &str {
    match distro {
        Distro::Debian => &endpoints.debian,
        Distro::Ubuntu => &endpoints.ubuntu,
    }
}

fn search_url(endpoints: &Endpoints, distro: Distro, keywords: &str) -> String {
    format!("{}search?keywords={}", site(endpoints, distro), encode(keywords))
}
