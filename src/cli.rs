use crate::model::{PackageQuery, QueryKind, RelationKind};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pkginfo",
    about = "Look up packages in Debian, Ubuntu, Arch Linux and Linux Mint archives",
    version,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalFlags {
    /// Config file (default: $XDG_CONFIG_HOME/pkginfo/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose summaries (architectures and extra metadata)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long, global = true, conflicts_with = "log_level")]
    pub quiet: bool,

    /// Logging level: trace, debug, info, warn or error
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Entries listed per summary
    #[arg(
        long,
        value_name = "N",
        global = true,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_results: Option<usize>,

    /// Print each result set as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Package details from packages.debian.org or packages.ubuntu.com
    Package {
        /// Release codename, e.g. "jessie" or "trusty"
        release: String,

        #[arg(required = true)]
        packages: Vec<String>,

        /// List dependencies
        #[arg(long, conflicts_with_all = ["recommends", "suggests"])]
        depends: bool,

        /// List recommended packages
        #[arg(long, conflicts_with = "suggests")]
        recommends: bool,

        /// List suggested packages
        #[arg(long)]
        suggests: bool,
    },

    /// Every available version, via madison
    Vlist {
        /// "debian", "ubuntu", "derivatives", "all" or a release codename
        distribution: String,

        #[arg(required = true)]
        packages: Vec<String>,

        /// Search by source package name
        #[arg(long)]
        source: bool,

        /// Newest versions first
        #[arg(long)]
        reverse: bool,
    },

    /// Search the Arch Linux repositories
    Archpkg {
        #[arg(required = true)]
        packages: Vec<String>,

        /// Only exact name matches
        #[arg(long)]
        exact: bool,
    },

    /// Search the Arch User Repository
    Archaur {
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Keyword search on the Debian or Ubuntu package site
    Pkgsearch {
        /// "debian", "ubuntu" or a release codename
        distribution: String,

        query: String,
    },

    /// Search a Linux Mint release's package list
    Mintpkg {
        /// Mint release, e.g. "victoria"
        release: String,

        #[arg(required = true)]
        packages: Vec<String>,

        /// Only exact name matches (default: substring)
        #[arg(long)]
        exact: bool,
    },
}

impl Command {
    /// One query per package argument, in argument order.
    pub fn queries(&self, verbose: bool) -> Vec<PackageQuery> {
        match self {
            Self::Package {
                release,
                packages,
                depends,
                recommends,
                suggests,
            } => {
                let relation = if *depends {
                    RelationKind::Depends
                } else if *recommends {
                    RelationKind::Recommends
                } else if *suggests {
                    RelationKind::Suggests
                } else {
                    RelationKind::None
                };
                build(QueryKind::Package, Some(release), packages, verbose)
                    .into_iter()
                    .map(|q| q.with_relation(relation))
                    .collect()
            }
            Self::Vlist {
                distribution,
                packages,
                source,
                reverse,
            } => build(QueryKind::Versions, Some(distribution), packages, verbose)
                .into_iter()
                .map(|q| q.with_source(*source).reversed(*reverse))
                .collect(),
            Self::Archpkg { packages, exact } => build(QueryKind::ArchRepo, None, packages, verbose)
                .into_iter()
                .map(|q| q.exact(*exact))
                .collect(),
            Self::Archaur { packages } => build(QueryKind::Aur, None, packages, verbose),
            Self::Pkgsearch {
                distribution,
                query,
            } => build(
                QueryKind::Search,
                Some(distribution),
                std::slice::from_ref(query),
                verbose,
            ),
            Self::Mintpkg {
                release,
                packages,
                exact,
            } => build(QueryKind::Mint, Some(release), packages, verbose)
                .into_iter()
                .map(|q| q.exact(*exact))
                .collect(),
        }
    }
}

fn build(
    kind: QueryKind,
    release: Option<&String>,
    names: &[String],
    verbose: bool,
) -> Vec<PackageQuery> {
    names
        .iter()
        .map(|name| {
            let query = PackageQuery::new(kind, name.as_str()).verbose(verbose);
            match release {
                Some(release) => query.with_release(release.as_str()),
                None => query,
            }
        })
        .collect()
}
