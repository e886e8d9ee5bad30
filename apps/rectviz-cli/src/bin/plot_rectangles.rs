use std::process::ExitCode;

use rectviz_cli::{input_path, EXIT_FAILURE, EXIT_USAGE};
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

    match rectviz_cli::plot_rectangles(&input, &RenderSettings::default()) {
        Ok(output) => {
            println!("{}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}: {e}", input.display());
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
