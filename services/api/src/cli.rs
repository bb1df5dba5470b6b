use crate::demo::{
    run_attachment_check, run_demo, run_locate, AttachmentCheckArgs, DemoArgs, LocateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use engineer_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Engineer Intake",
    about = "Run the engineer booking and registration intake service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the booking and registration flows end to end and print each step as JSON
    Demo(DemoArgs),
    /// Degree certificate helpers
    Attachment {
        #[command(subcommand)]
        command: AttachmentCommand,
    },
    /// Reverse-geocode a coordinate pair through the configured geocoder
    Locate(LocateArgs),
}

#[derive(Subcommand, Debug)]
enum AttachmentCommand {
    /// Check whether a local file would be accepted as a degree certificate
    Check(AttachmentCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Attachment {
            command: AttachmentCommand::Check(args),
        } => run_attachment_check(args),
        Command::Locate(args) => run_locate(args).await,
    }
}
