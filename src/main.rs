//! Forecast engine entry point: CLI wiring and report printing.

mod cli;

use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cel_forecast::clock::{FixedClock, HourSource, SystemClock};
use cel_forecast::config::EngineConfig;
use cel_forecast::forecast::{CommunityForecast, compute_forecast};
use cel_forecast::history::{HistorySource, StaticHistory, load_history};
use cel_forecast::io::export::export_csv;
use cel_forecast::surplus::{ForecastSummary, evaluate, generate};

use cli::{CliOptions, Command};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            return Ok(());
        }
        Err(msg) => {
            cli::print_usage();
            bail!(msg);
        }
    };

    let config = load_config(&opts)?;
    let clock: Arc<dyn HourSource> = match opts.hour {
        Some(h) => Arc::new(FixedClock::new(h)?),
        None => Arc::new(SystemClock),
    };
    let history: Arc<dyn HistorySource> =
        Arc::new(StaticHistory::new(config.organizations.clone()));

    let org_id = match opts.organization.clone() {
        Some(id) => id,
        None => history
            .organization_ids()
            .into_iter()
            .next()
            .context("no organizations configured")?,
    };

    let (org, data) = load_history(
        history.as_ref(),
        &org_id,
        config.history.default_capacity_kwp,
    )?
    .with_context(|| format!("organization \"{org_id}\" not found"))?;
    info!(org_id = %org.id, members = org.members.len(), "loaded community history");

    let fc = compute_forecast(org.id.clone(), &data, &config)?;
    let hour = clock.current_hour();

    println!("{} ({})", org.name, org.id);
    println!(
        "History: {:.1} kWh/day produced, {:.1} kWh/day consumed, {:.1} kWp installed",
        data.avg_daily_production_kwh,
        data.avg_daily_consumption_kwh,
        data.installed_capacity_kwp
    );
    println!(
        "Daylight: {:02}:00-{:02}:00, solar noon at {:.1}h\n",
        config.production.sunrise_hour,
        config.production.sunset_hour,
        config.production.solar_noon()
    );
    print_forecast(&fc);
    println!("\n{}", ForecastSummary::from_forecast(&fc));

    if let Some(point) = fc.point(hour) {
        let status = evaluate(
            point.production_kw,
            point.expected_consumption_kw,
            &config.thresholds,
        )?;
        println!(
            "\nNow ({hour:02}:00): {:+.2} kW, {:?}, severity {}",
            status.surplus_kw, status.status, status.severity
        );

        if let Some(member) = org.members.first() {
            let share = point.expected_surplus_kw / org.members.len() as f64;
            let rec = generate(
                member.id.clone(),
                share,
                hour,
                &fc.forecast,
                &fc.optimal_windows,
                &config.thresholds,
            )?;
            for item in &rec.items {
                println!("{} [{:?}]: {}", member.name, item.urgency, item.action);
            }
        }
    }

    if let Some(ref path) = opts.csv_out {
        export_csv(&fc, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), "forecast written");
    }

    #[cfg(feature = "api")]
    if opts.serve {
        serve(config, history, clock, opts.port)?;
    }

    Ok(())
}

/// `--config` takes priority, then `--preset`, then the baseline.
fn load_config(opts: &CliOptions) -> anyhow::Result<EngineConfig> {
    let config = if let Some(ref path) = opts.config {
        EngineConfig::from_toml_file(path)?
    } else if let Some(ref name) = opts.preset {
        EngineConfig::from_preset(name)?
    } else {
        EngineConfig::baseline()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        bail!("invalid configuration:\n{joined}");
    }
    Ok(config)
}

fn print_forecast(fc: &CommunityForecast) {
    println!(" hour | production kW | consumption kW | surplus kW");
    println!("------+---------------+----------------+-----------");
    for p in &fc.forecast {
        let marker = if fc.window_at(p.hour).is_some() { "*" } else { "" };
        println!(
            "  {:02}  | {:>13.2} | {:>14.2} | {:>+9.2} {marker}",
            p.hour, p.production_kw, p.expected_consumption_kw, p.expected_surplus_kw
        );
    }

    if fc.optimal_windows.is_empty() {
        println!("\nNo surplus windows today.");
    } else {
        println!("\nSurplus windows (best first):");
        for w in &fc.optimal_windows {
            println!(
                "  {:02}:00-{:02}:00  {:.2} kWh  (avg {:.2} kW)",
                w.start_hour,
                w.end_hour + 1,
                w.total_surplus_kwh,
                w.avg_surplus_kw
            );
        }
    }
}

#[cfg(feature = "api")]
fn serve(
    config: EngineConfig,
    history: Arc<dyn HistorySource>,
    clock: Arc<dyn HourSource>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    use std::net::{IpAddr, SocketAddr};

    let ip: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server host \"{}\"", config.server.host))?;
    let addr = SocketAddr::new(ip, port.unwrap_or(config.server.port));

    let state = Arc::new(cel_forecast::api::AppState {
        config,
        history,
        clock,
    });
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(cel_forecast::api::serve(state, addr))
        .context("API server failed")?;
    Ok(())
}
