use std::process::ExitCode;

use cfxml::ui::output;

fn main() -> ExitCode {
    match cfxml::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
