use std::process::ExitCode;

fn main() -> ExitCode {
    mashti_cli::run()
}
