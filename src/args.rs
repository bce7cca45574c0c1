use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Sweeps a birth-death skyline model through time and reports its parameters.",
    long_about = None,
)]
pub struct Args {
    /// Path to settings (yaml file). Replaces the rates given on the command line.
    #[clap(long)]
    pub settings: Option<String>,

    /// Transmission rates, one per interval.
    #[clap(long, num_args = 1.., default_values_t = vec![0.4, 0.5, 0.6])]
    pub la: Vec<f64>,

    /// Removal rates, one per interval.
    #[clap(long, num_args = 1.., default_values_t = vec![0.1, 0.2, 0.3])]
    pub psi: Vec<f64>,

    /// Sampling probabilities, one per interval.
    #[clap(long, num_args = 1.., default_values_t = vec![0.5, 0.6, 0.7])]
    pub p: Vec<f64>,

    /// Times at which the intervals end, in ascending order.
    #[clap(long, num_args = 1.., default_values_t = vec![2.0, 5.0, 10.0])]
    pub t: Vec<f64>,

    /// Average number of recipients per transmission.
    #[clap(long, default_value_t = 1.0)]
    pub recipients: f64,

    /// Notification probability of contact tracing. Disabled if zero.
    #[clap(long, default_value_t = 0.0)]
    pub upsilon: f64,

    /// Maximum number of notified contacts per removed host.
    #[clap(long, default_value_t = 1)]
    pub max_notified_contacts: usize,

    /// Total time to sweep. Defaults to the end of the last interval.
    #[clap(long)]
    pub total_time: Option<f64>,

    /// Time between two consecutive sweep points.
    #[clap(long, default_value_t = 0.1)]
    pub step: f64,

    /// Path to output (csv file) for the parameter trajectory.
    #[clap(long, short)]
    pub output: Option<String>,

    /// Path to log file.
    #[clap(long, default_value = "bdsky.log")]
    pub log_file: String,

    /// Increase logging verbosity.
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not show a progress bar.
    #[clap(long)]
    pub disable_progress_bar: bool,
}
