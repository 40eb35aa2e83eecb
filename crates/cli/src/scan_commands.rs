use std::path::PathBuf;

use {
    anyhow::{Context, Result},
    clap::Args,
    cmdload::{
        AutoloadError, AutoloadOptions, Autoloader, ModuleRegistry, PathParams, ProgramRoot,
    },
    cmdload_config::CmdloadConfig,
};

#[derive(Args)]
pub struct ScanArgs {
    /// Command directory (overrides the config file).
    #[arg(long)]
    path: Option<String>,

    /// Glob pattern; repeat for several (overrides the config file).
    #[arg(short, long = "pattern")]
    patterns: Vec<String>,

    /// Directory relative command paths are resolved against
    /// (default: directory of this executable).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Print `{absolute, relative}` entries as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Print the match set for the configured command directory.
pub async fn handle_scan(args: ScanArgs, config: CmdloadConfig) -> Result<()> {
    let mut options: AutoloadOptions<()> = AutoloadOptions::from_config(&config.autoload);
    if let Some(path) = args.path {
        options = options.path(path);
    }
    if !args.patterns.is_empty() {
        options = options.patterns(args.patterns);
    }

    let root = match args.root {
        Some(dir) => ProgramRoot::new(dir),
        None => ProgramRoot::from_current_exe()?,
    };

    // Scanning never loads anything, so an empty registry is enough.
    let autoloader = Autoloader::new(root, ModuleRegistry::<()>::new());
    let matches = autoloader.scan(&options).await?;

    if matches.is_empty() && options.fail_glob {
        return Err(AutoloadError::NoMatches.into());
    }

    print_matches(&matches, args.json)
}

fn print_matches(matches: &[PathParams], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(matches).context("serialize matches")?;
        println!("{out}");
    } else {
        for m in matches {
            println!("{}", m.relative);
        }
    }
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn handle_config(config: &CmdloadConfig) -> Result<()> {
    let out = toml::to_string_pretty(config).context("serialize config")?;
    print!("{out}");
    Ok(())
}
