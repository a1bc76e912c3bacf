use {clap::Parser, inkgrain::Cli, std::process::ExitCode};

fn main() -> ExitCode {
    env_logger::init();

    match Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
