use std::path::{Path, PathBuf};

use anyhow::Result;
use blog::config::{BlogConfig, LoggingConfig};
use blog::domain::factory::PostFactory;
use blog::module::{migrate, pending_migrations};
use blog::{Blog, NewUser};
use blog_db::DbHandle;
use clap::{Parser, Subcommand};
use fake::Fake;
use fake::faker::internet::en::Password;
use fake::faker::name::en::Name;
use tracing_subscriber::EnvFilter;

/// Blog database tool
#[derive(Parser)]
#[command(name = "blog-cli")]
#[command(about = "Migrate, seed and inspect the blog database")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database DSN override (overrides config)
    #[arg(long)]
    dsn: Option<String>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations
    Migrate,
    /// Insert synthetic users and posts
    Seed {
        /// Users to create before generating posts
        #[arg(long, default_value_t = 0)]
        users: usize,
        /// Posts to generate
        #[arg(long, default_value_t = 10)]
        posts: usize,
    },
    /// Validate configuration, print it and list pending migrations
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (BLOG__*) -> 4) CLI overrides
    let mut config = BlogConfig::load(cli.config.as_deref())?;
    if let Some(dsn) = cli.dsn {
        config.database.dsn = dsn;
        config.database.validate()?;
    }

    init_logging(&config.logging, cli.verbose)?;
    tracing::info!("blog-cli starting");

    match cli.command.unwrap_or(Commands::Migrate) {
        Commands::Migrate => run_migrate(&config).await,
        Commands::Seed { users, posts } => seed(&config, users, posts).await,
        Commands::Check => check(&config).await,
    }
}

fn init_logging(cfg: &LoggingConfig, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => cfg.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    let installed = if cfg.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

async fn run_migrate(config: &BlogConfig) -> Result<()> {
    // Starting the module applies pending migrations.
    let blog = Blog::start(config).await?;
    let again = migrate(blog.db()).await?;
    println!(
        "Schema up to date ({} migrations recorded)",
        again.skipped + again.applied
    );
    Ok(())
}

async fn seed(config: &BlogConfig, users: usize, posts: usize) -> Result<()> {
    let blog = Blog::start(config).await?;
    let service = blog.service();

    let offset = service.count_users().await?;
    for n in 0..users {
        let index = offset + u64::try_from(n)? + 1;
        let user = service
            .create_user(NewUser {
                country_id: None,
                name: Name().fake(),
                email: format!("seed{index}@example.test"),
                password: Password(12..20).fake(),
                balance: (0..10_000).fake::<i64>(),
            })
            .await?;
        tracing::debug!(user_id = user.id, "Seeded user");
    }

    let created = PostFactory::new().create_many(service, posts).await?;
    println!("Seeded {users} users and {} posts", created.len());
    Ok(())
}

async fn check(config: &BlogConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", serde_json::to_string_pretty(config)?);

    // Connect without migrating so pending work stays visible.
    let db = DbHandle::from_config(&config.database).await?;
    let pending = pending_migrations(&db).await?;
    if pending.is_empty() {
        println!("No pending migrations");
    } else {
        for name in pending {
            println!("pending: {name}");
        }
    }
    Ok(())
}
