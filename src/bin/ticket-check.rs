use std::process;

use clap::Parser;

use ticket_actions::check::{self, Outcome};
use ticket_actions::cli::CheckArgs;
use ticket_actions::ui;

fn main() {
    let args = CheckArgs::parse();
    ui::init_tracing(args.verbose);

    match check::run(args) {
        Ok(Outcome::Skipped(_)) | Ok(Outcome::Verified { .. }) => {}
        Err(err) => {
            ui::failure(format!("Failure: {}", err));
            process::exit(1);
        }
    }
}
