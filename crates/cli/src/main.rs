use std::process::ExitCode;

fn main() -> ExitCode {
    vitarec_cli::run()
}
