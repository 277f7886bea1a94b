use std::path::PathBuf;
use std::process::ExitCode;

use sun_spectrum::config::SpectrumConfig;
use sun_spectrum::run::generate_all;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Single optional argument: path to a JSON config.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let result = SpectrumConfig::discover(config_path.as_deref())
        .and_then(|config| generate_all(&config));
    match result {
        Ok(files) => {
            log::info!("Done, {} outputs written", files.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
