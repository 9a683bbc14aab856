use std::process::ExitCode;

fn main() -> ExitCode {
    aluquote_cli::run()
}
