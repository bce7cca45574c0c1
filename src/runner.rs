use anyhow::{Result, bail};

use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;

use crate::args::Args;
use crate::config::{ContactTracingSettings, Settings};
use crate::core::Model;
use crate::readwrite::{TrajectoryEntry, TrajectoryWriter};

/// Upper bound on the number of time points of a sweep.
pub const MAX_SWEEP_POINTS: usize = 10_000_000;

pub struct Runner {
    args: Args,
    settings: Settings,
    model: Box<dyn Model>,
}

impl Runner {
    pub fn new(args: Args) -> Result<Runner> {
        Self::setup_logger(&args);
        Self::build(args)
    }

    /// Load settings and build the model without touching the global logger
    fn build(args: Args) -> Result<Runner> {
        let settings = Self::load_settings(&args)?;
        let model = settings.build_model()?;
        log::info!("Configured model {}.", model.get_name());

        Ok(Self {
            args,
            settings,
            model,
        })
    }

    pub fn start(&mut self) -> Result<()> {
        self.run()
    }

    /// Setup logging level and file
    fn setup_logger(args: &Args) {
        let log_level = match args.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        simple_logging::log_to_file(args.log_file.as_str(), log_level).unwrap_or_else(|_| {
            eprintln!("Unable to open log file.");
            std::process::exit(1);
        });
    }

    /// Load settings from file or assemble them from the command line
    fn load_settings(args: &Args) -> Result<Settings> {
        let settings = match &args.settings {
            Some(path) => Settings::read_from_file(path)?,
            None => {
                let mut settings = Settings::from_rates(&args.la, &args.psi, &args.p, &args.t)?;
                settings.recipients = args.recipients;
                if args.upsilon > 0.0 {
                    settings.contact_tracing = Some(ContactTracingSettings {
                        upsilon: args.upsilon,
                        max_notified_contacts: args.max_notified_contacts,
                    });
                }
                settings
            }
        };
        log::info!("Loaded settings\n{}", settings);
        Ok(settings)
    }

    fn total_time(&self) -> Result<f64> {
        let total_time = match self.args.total_time {
            Some(total_time) => total_time,
            None => match self.settings.intervals.last() {
                Some(interval) => interval.end,
                None => bail!("Settings do not define any interval."),
            },
        };
        if !total_time.is_finite() || total_time < 0.0 {
            bail!("Total time must be finite and non-negative, got {total_time}. Set --total-time.");
        }
        Ok(total_time)
    }

    fn run(&mut self) -> Result<()> {
        let total_time = self.total_time()?;
        let times = sweep_times(total_time, self.args.step, &self.model.change_times())?;
        log::info!(
            "Sweeping {} time points up to time {total_time}.",
            times.len()
        );

        let mut writer = match &self.args.output {
            Some(path) => Some(TrajectoryWriter::create(path)?),
            None => None,
        };

        let bar = match self.args.disable_progress_bar {
            true => None,
            false => {
                let bar = ProgressBar::new(times.len() as u64);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("[{bar:40}] {pos:>7}/{len:7} [{elapsed_precise}] {msg}")?
                        .progress_chars("=> "),
                );
                Some(bar)
            }
        };

        for (step, &time) in times.iter().enumerate() {
            let selection = self.model.select(time);
            log::debug!("Selected interval {} at time {time}.", selection.label());

            if selection.switched() {
                match selection.epidemiological_parameters() {
                    Ok(parameters) => log::info!(
                        "Epidemiological parameters of {}:\n{}",
                        selection.label(),
                        parameters
                    ),
                    Err(err) => log::warn!("Unable to convert rates: {err}."),
                }
            }

            if let Some(writer) = writer.as_mut() {
                writer.write(&TrajectoryEntry::from_selection(time, &selection))?;
            }

            if let Some(bar) = bar.as_ref() {
                bar.set_position(step as u64 + 1);
                bar.set_message(selection.label().to_string());
            }
        }

        if let Some(writer) = writer.as_mut() {
            writer.flush()?;
        }

        if let Some(bar) = bar {
            bar.finish_with_message("Done.");
        }
        log::info!("Finished sweep with model {}.", self.model.get_name());
        Ok(())
    }
}

/// Time points of a sweep from zero to `total_time`.
///
/// Points are spaced by `step` and complemented with the change times of the model that fall
/// into the sweep, so that every interval switch is visited.
pub fn sweep_times(total_time: f64, step: f64, change_times: &[f64]) -> Result<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        bail!("Step must be finite and positive, got {step}.");
    }

    // grid points closer than this to a change time are replaced by the change time
    let tolerance = step * 1e-6;

    let n_steps = (total_time / step + 1e-9).floor();
    if !n_steps.is_finite() || n_steps >= MAX_SWEEP_POINTS as f64 {
        bail!(
            "Sweep up to time {total_time} with step {step} exceeds {MAX_SWEEP_POINTS} time points. Increase --step."
        );
    }

    let changes: Vec<f64> = change_times
        .iter()
        .copied()
        .filter(|&time| (0.0..=total_time).contains(&time))
        .collect();
    let grid = (0..=n_steps as usize)
        .map(|idx| (idx as f64 * step).min(total_time))
        .filter(|time| !changes.iter().any(|change| (change - time).abs() <= tolerance));

    Ok(grid.merge(changes.iter().copied()).dedup().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn sweep_includes_change_times() {
        let times = sweep_times(1.0, 0.5, &[-1.0, 0.5, 0.75, 2.0]).unwrap();
        assert_eq!(times, vec![0.0, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn sweep_without_steps() {
        assert_eq!(sweep_times(0.0, 1.0, &[]).unwrap(), vec![0.0]);
        assert!(sweep_times(1.0, 0.0, &[]).is_err());
        assert!(sweep_times(1.0, f64::NAN, &[]).is_err());
    }

    #[test]
    fn sweep_snaps_to_change_times() {
        let times = sweep_times(0.5, 0.1, &[0.3]).unwrap();
        assert_eq!(times.len(), 6);
        assert!(times.contains(&0.3));
        assert_eq!(times.iter().filter(|t| (*t - 0.3).abs() < 1e-9).count(), 1);
        assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn sweep_rejects_oversized_grids() {
        assert!(sweep_times(1e30, 1.0, &[]).is_err());
        assert!(sweep_times(1e9, 0.1, &[2.0]).is_err());
        assert!(sweep_times(f64::INFINITY, 1.0, &[]).is_err());
    }

    #[test]
    fn settings_from_command_line() {
        let args = Args::parse_from([
            "bdsky",
            "--la",
            "2.0",
            "1.0",
            "--psi",
            "0.5",
            "0.5",
            "--p",
            "0.6",
            "0.4",
            "--t",
            "3.0",
            "6.0",
            "--upsilon",
            "0.2",
        ]);
        let settings = Runner::load_settings(&args).unwrap();
        assert_eq!(settings.intervals.len(), 2);
        assert_eq!(settings.intervals[1].end, 6.0);
        assert_eq!(settings.recipients, 1.0);
        assert_eq!(
            settings.contact_tracing,
            Some(ContactTracingSettings {
                upsilon: 0.2,
                max_notified_contacts: 1,
            })
        );
    }

    #[test]
    fn default_command_line() {
        let args = Args::parse_from(["bdsky"]);
        let settings = Runner::load_settings(&args).unwrap();
        let mut model = settings.build_model().unwrap();
        assert_eq!(model.select(6.0).label(), "BD3");
        assert_eq!(settings.contact_tracing, None);
    }

    #[test]
    fn mismatched_command_line() {
        let args = Args::parse_from(["bdsky", "--la", "2.0", "--psi", "0.5", "--p", "0.6"]);
        assert!(Runner::load_settings(&args).is_err());
    }

    #[test]
    fn sweep_writes_trajectory() {
        let output = std::env::temp_dir().join("test_bdsky_trajectory.csv");
        let args = Args::parse_from([
            "bdsky",
            "--la",
            "2.0",
            "1.0",
            "--psi",
            "0.5",
            "0.0",
            "--p",
            "0.6",
            "0.4",
            "--t",
            "1.0",
            "2.0",
            "--step",
            "0.5",
            "--output",
            output.to_str().unwrap(),
            "--disable-progress-bar",
        ]);
        let mut runner = Runner::build(args).unwrap();
        runner.start().unwrap();
        assert_eq!(runner.model.get_name(), "BD2");

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        std::fs::remove_file(&output).unwrap();

        let times: Vec<f64> = records.iter().map(|r| r[0].parse().unwrap()).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);

        let labels: Vec<&str> = records.iter().map(|r| &r[1]).collect();
        assert_eq!(labels, vec!["BD1", "BD1", "BD2", "BD2", "BD2"]);

        for record in &records[..2] {
            assert_eq!(record[5].parse::<f64>().unwrap(), 4.0);
            assert_eq!(record[6].parse::<f64>().unwrap(), 2.0);
        }
        for record in &records[2..] {
            assert_eq!(record[3].parse::<f64>().unwrap(), 0.0);
            assert_eq!(&record[5], "");
            assert_eq!(&record[6], "");
        }
    }
}
