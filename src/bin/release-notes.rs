use std::process;

use clap::Parser;

use ticket_actions::cli::NotesArgs;
use ticket_actions::release::{self, Delivery};
use ticket_actions::ui;

fn main() {
    let args = NotesArgs::parse();
    ui::init_tracing(args.verbose);

    match release::run(args) {
        Ok(Delivery::Printed { path }) | Ok(Delivery::Published { path, .. }) => {
            ui::step(format!("Release notes saved to {}", path.display()));
        }
        Err(err) => {
            ui::failure(err.to_string());
            process::exit(1);
        }
    }
}
