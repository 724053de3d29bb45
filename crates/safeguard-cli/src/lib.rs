mod cli;
mod config;
mod init;
mod replay;
mod show;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    if let cli::Command::Help(topic) = cmd {
        cli::print_help(topic);
        return Ok(());
    }

    // A missing .env file is not an error.
    dotenvy::dotenv().ok();
    init_tracing();

    match cmd {
        cli::Command::Help(_) => Ok(()),
        cli::Command::Config(cmd) => match cmd {
            cli::ConfigCommand::Show(args) => show::run(args),
            cli::ConfigCommand::Init(args) => init::run(args),
        },
        cli::Command::Replay(args) => replay::run(args).await,
    }
}

fn init_tracing() {
    // Logs go to stderr so stdout stays machine-readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safeguard=info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
