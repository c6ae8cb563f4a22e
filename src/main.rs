mod cli;
mod path_de;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}

// RUST_LOG controls the level, default warn
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
