use clap::Parser;
use locale_audit::cli::commands::{cmd_check, cmd_extract, cmd_match};
use locale_audit::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Check {
            url,
            format,
            output_dir,
            embeddings,
            judge,
        } => {
            let clean = cmd_check(
                url.as_deref(),
                &format,
                output_dir.as_deref(),
                &embeddings,
                &judge,
                &config,
                cli.verbose,
            )?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Match {
            source,
            target,
            embeddings,
        } => {
            cmd_match(&source, &target, &embeddings, &config, cli.verbose)?;
        }
        Commands::Extract { url, locale, output } => {
            cmd_extract(&url, &locale, &output, &config, cli.verbose)?;
        }
    }

    Ok(())
}
