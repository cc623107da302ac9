use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing, logging to stderr so stdout stays clean for dry runs
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "ticket_actions=debug"
    } else {
        "ticket_actions=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Print a progress line
pub fn step(message: impl AsRef<str>) {
    println!("{} {}", ">".bright_green(), message.as_ref());
}

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "+".bright_green(), message.as_ref().bright_cyan());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{} {}", "!".yellow(), message.as_ref());
}

/// Print a fatal error to stderr
pub fn failure(message: impl AsRef<str>) {
    eprintln!("{} {}", "x".red(), message.as_ref());
}
