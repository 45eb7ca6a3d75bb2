use std::env;
use std::path::PathBuf;

/// Parsed CLI arguments.
#[derive(Debug)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub organization: Option<String>,
    pub hour: Option<u8>,
    pub csv_out: Option<PathBuf>,
    pub serve: bool,
    pub port: Option<u16>,
}

pub enum Command {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> Result<Command, String> {
    let mut opts = CliOptions {
        config: None,
        preset: None,
        organization: None,
        hour: None,
        csv_out: None,
        serve: false,
        port: None,
    };

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--config" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| "missing value for --config (expected a TOML path)".to_string())?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args
                    .get(i)
                    .ok_or_else(|| "missing value for --preset (expected a preset name)".to_string())?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--organization" => {
                i += 1;
                let id = args
                    .get(i)
                    .ok_or_else(|| "missing value for --organization (expected an id)".to_string())?;
                opts.organization = Some(id.to_string());
            }
            "--hour" => {
                i += 1;
                let raw = args
                    .get(i)
                    .ok_or_else(|| "missing value for --hour (expected 0-23)".to_string())?;
                match raw.parse::<u8>() {
                    Ok(h) if h < 24 => opts.hour = Some(h),
                    _ => return Err(format!("--hour value \"{raw}\" is not an hour in 0-23")),
                }
            }
            "--csv-out" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| "missing value for --csv-out (expected a file path)".to_string())?;
                opts.csv_out = Some(PathBuf::from(path));
            }
            "--serve" => opts.serve = true,
            "--port" => {
                i += 1;
                let raw = args
                    .get(i)
                    .ok_or_else(|| "missing value for --port (expected a u16)".to_string())?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                opts.port = Some(port);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(Command::Run(opts))
}

pub fn print_usage() {
    eprintln!("cel-forecast: community energy forecast and surplus recommendations");
    eprintln!();
    eprintln!("Usage: cel-forecast [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load engine config from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, summer, winter)");
    eprintln!("  --organization <id>      Community to forecast (default: first configured)");
    eprintln!("  --hour <0-23>            Override the current hour");
    eprintln!("  --csv-out <path>         Export the forecast to CSV");
    eprintln!("  --serve                  Start the REST API server");
    eprintln!("  --port <u16>             API server port (default: from config)");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the baseline preset is used.");
}
