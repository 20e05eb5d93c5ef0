//! Tree subcommands.

use super::TreeArgs;

/// Tree command group.
#[derive(Debug, clap::Subcommand)]
pub enum TreeCommands {
    /// Print the root digest, height and leaf count.
    Root {
        #[command(flatten)]
        args: TreeArgs,
    },
    /// Print the width of every level.
    Levels {
        #[command(flatten)]
        args: TreeArgs,
        /// Also print every digest of every level.
        #[arg(long, default_value_t = false)]
        digests: bool,
    },
}
