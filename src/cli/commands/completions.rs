//! `cabprice completions` - shell completion scripts
//!
//! Supported shells are whatever `clap_complete::Shell` offers: bash, elvish,
//! fish, powershell and zsh. Cabinet, set and style ids are not completed;
//! they come from the catalog at run time.
//!
//! ```bash
//! cabprice completions bash > ~/.local/share/bash-completion/completions/cabprice
//! cabprice completions zsh > "${fpath[1]}/_cabprice"
//! cabprice completions fish > ~/.config/fish/completions/cabprice.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
