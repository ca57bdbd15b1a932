use std::process::ExitCode;

fn main() -> ExitCode {
    autolysis::app::run()
}
