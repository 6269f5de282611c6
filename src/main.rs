use clap::Parser;
use miette::Result;
use cabprice::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let default_filter = if global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Eval(args) => cabprice::cli::commands::eval::run(args, &global),
        Commands::Price(args) => cabprice::cli::commands::price::run(args, &global),
        Commands::Volume(args) => cabprice::cli::commands::volume::run(args, &global),
        Commands::Hardware(cmd) => cabprice::cli::commands::hardware::run(cmd, &global),
        Commands::Catalog(cmd) => cabprice::cli::commands::catalog::run(cmd, &global),
        Commands::Completions(args) => cabprice::cli::commands::completions::run(args),
    }
}
