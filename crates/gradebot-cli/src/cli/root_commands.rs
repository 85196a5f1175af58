use std::fmt;
use std::str::FromStr;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Grade every repository of the organization not yet at full marks.
    Run(RunArgs),
    /// Grade a single repository.
    Grade(GradeArgs),
    /// Serve the webhook endpoint that grades repositories on push.
    Serve(ServeArgs),
    /// Show the GitHub account the token belongs to.
    Whoami,
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Organization to grade (defaults to github.organization)
    #[arg(long)]
    pub org: Option<String>,

    /// Re-grade repositories already in the completion cache
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Debug, Args)]
pub struct GradeArgs {
    /// Repository as owner/name
    pub repository: RepoRef,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (defaults to server.bind)
    #[arg(long)]
    pub bind: Option<String>,
}

/// An `owner/name` repository reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!("expected <owner>/<repo>, got '{s}'")),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
