use clap::Parser;
use horizons::cli::{
    handle_goal, handle_list, handle_note, handle_plan, handle_tag, handle_target, handle_task,
    Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Task(cmd) => handle_task(cmd.action),
        Commands::List(cmd) => handle_list(cmd.action),
        Commands::Goal(cmd) => handle_goal(cmd.action),
        Commands::Target(cmd) => handle_target(cmd.action),
        Commands::Plan(cmd) => handle_plan(cmd.action),
        Commands::Tag(cmd) => handle_tag(cmd.action),
        Commands::Note(cmd) => handle_note(cmd.action),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
