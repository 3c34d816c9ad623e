//! Redirect CLI
//!
//! Command-line interface working directly on a redirect library file.

use clap::{Args as ClapArgs, Parser, Subcommand};
use redirect_engine::{
    AdminService, Config, LookupService, RedirectError, Resolution, Result, Selector,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Redirect CLI
#[derive(Parser, Debug)]
#[command(name = "redirect-cli")]
#[command(about = "CLI for the redirect library")]
struct Args {
    /// Redirect library file
    #[arg(short, long, default_value = "./RedirectLibrary.rdlb")]
    store: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all entries in order
    List,

    /// Resolve a request URL
    Get {
        /// The request URL (host + path)
        request_url: String,
    },

    /// Add an entry
    Add {
        request_url: String,
        redirect_url: String,
    },

    /// Update the selected entry
    Update {
        #[command(flatten)]
        target: Target,

        /// New request URL
        request_url: String,

        /// New redirect URL
        redirect_url: String,
    },

    /// Delete the selected entry
    Del {
        #[command(flatten)]
        target: Target,
    },
}

/// Selects an existing entry by position or by request URL
#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct Target {
    /// Zero-based position
    #[arg(short, long)]
    index: Option<usize>,

    /// Current request URL
    #[arg(short, long)]
    key: Option<String>,
}

impl Target {
    fn selector(self) -> Result<Selector> {
        match (self.index, self.key) {
            (Some(index), _) => Ok(Selector::Position(index)),
            (None, Some(key)) => Ok(Selector::Key(key)),
            (None, None) => Err(RedirectError::MissingField("index")),
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    let config = Config::builder().store_path(&args.store).build();

    if let Err(e) = run(&config, args.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Commands) -> Result<()> {
    let admin = AdminService::new(config);

    match command {
        Commands::List => {
            for (i, entry) in admin.list()?.iter().enumerate() {
                println!("{}\t{}\t{}", i, entry.key, entry.value);
            }
        }
        Commands::Get { request_url } => {
            let lookup = LookupService::new(config);
            match lookup.resolve(&request_url)? {
                Resolution::Found(value) => println!("{}", value),
                Resolution::NotFound => println!("(not found) -> {}", lookup.fallback_url()),
            }
        }
        Commands::Add {
            request_url,
            redirect_url,
        } => {
            let position = admin.add(&request_url, &redirect_url)?;
            println!("added at index {}", position);
        }
        Commands::Update {
            target,
            request_url,
            redirect_url,
        } => {
            let position = admin.update(&target.selector()?, &request_url, &redirect_url)?;
            println!("updated, now at index {}", position);
        }
        Commands::Del { target } => {
            let position = admin.delete(&target.selector()?)?;
            println!("deleted index {}", position);
        }
    }

    Ok(())
}
