use std::io;
use std::process::ExitCode;

use rectviz_cli::{input_path, StepSession, EXIT_FAILURE, EXIT_USAGE};
use rectviz_io::RenderSettings;

fn main() -> ExitCode {
    rectviz_cli::init_logging();

    let input = match input_path(std::env::args_os()) {
        Ok(path) => path,
        Err(usage) => {
            println!("{usage}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let result = StepSession::open(&input, &RenderSettings::default())
        .and_then(|mut session| session.run(io::stdin().lock(), io::stdout().lock()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}: {e}", input.display());
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
