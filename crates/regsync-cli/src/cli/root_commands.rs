use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the full upload, transfer and supersede scenario.
    Run,
    /// Show a project's mandatory-field schema.
    Schema(ProjectArgs),
    /// List a project's documents.
    List(ListArgs),
    /// Print a freshly generated document descriptor.
    Generate(ProjectArgs),
    /// Copy this run's documents missing from the destination project.
    Transfer(TransferArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ProjectArgs {
    /// Register project id.
    pub project: String,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Register project id.
    pub project: String,

    /// Search query (defaults to the run id).
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TransferArgs {
    /// Source project (defaults to `projects.source`).
    #[arg(long = "from")]
    pub from: Option<String>,

    /// Destination project (defaults to `projects.destination`).
    #[arg(long = "to")]
    pub to: Option<String>,
}
