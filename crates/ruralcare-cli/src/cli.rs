//! Argument parsing and command dispatch.

use std::io::{self, IsTerminal};

use clap::{Args, Parser, Subcommand, ValueEnum};
use ruralcare_api_models::{ReportType, Severity, UserRole};
use ruralcare_dashboard::ViewTab;
use ruralcare_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use url::Url;

use crate::client::{AppContext, CliResult, parse_url};
use crate::commands::directory::{
    handle_add_doctor, handle_add_stock, handle_add_user, handle_add_water, handle_list_users,
};
use crate::commands::report::{handle_report_show, handle_submit};
use crate::commands::view::handle_view;
use crate::commands::watch::handle_watch;
use crate::output::Style;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:8001";
const BUILD_SHA: &str = match option_env!("RURALCARE_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, executes the requested command and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&logging_config(&cli)) {
        eprintln!("warning: {err:#}");
    }

    let command_name = command_label(&cli.command);
    tracing::debug!(command = command_name, api_url = %cli.api_url, "dispatching command");

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::debug!(command = command_name, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

fn logging_config(cli: &Cli) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &cli.log_level,
        format: LogFormat::from_name(cli.log_format.as_deref()),
        build_sha: BUILD_SHA,
        ansi: io::stderr().is_terminal(),
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli)?;
    let style = Style {
        color: cli.output == OutputFormat::Table && io::stdout().is_terminal(),
    };
    let format = cli.output;

    match cli.command {
        Command::View(args) => handle_view(&ctx, &args, format, style).await,
        Command::Report(args) => handle_report_show(&ctx, &args, format, style).await,
        Command::Submit(args) => handle_submit(&ctx, args, format, style).await,
        Command::Add(add) => match add {
            AddCommand::Water(args) => handle_add_water(&ctx, args, format).await,
            AddCommand::Doctor(args) => handle_add_doctor(&ctx, args, format).await,
            AddCommand::Stock(args) => handle_add_stock(&ctx, args, format).await,
            AddCommand::User(args) => handle_add_user(&ctx, args, format).await,
        },
        Command::Users => handle_list_users(&ctx, format).await,
        Command::Watch(args) => handle_watch(&ctx, &args, format, style).await,
    }
}

#[derive(Parser)]
#[command(name = "ruralcare", about = "RuralCare health-monitoring dashboard")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "RURALCARE_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "RURALCARE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "RURALCARE_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "RURALCARE_LOG_FORMAT")]
    pub(crate) log_format: Option<String>,
    #[arg(
        long,
        global = true,
        env = "RURALCARE_STRICT_LOCATION",
        help = "Reject reports without explicit coordinates instead of placing them near the district centre"
    )]
    pub(crate) strict_location: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Load all dashboard data and render one view.
    View(ViewArgs),
    /// Show a single health report.
    Report(ReportShowArgs),
    /// Submit a new health report.
    Submit(SubmitArgs),
    /// Record directory entries.
    #[command(subcommand)]
    Add(AddCommand),
    /// Refresh periodically and show the rolling alert list.
    Watch(WatchArgs),
    /// List registered users.
    Users,
}

#[derive(Subcommand)]
pub(crate) enum AddCommand {
    /// Record a water-quality sample.
    Water(AddWaterArgs),
    /// Register a doctor.
    Doctor(AddDoctorArgs),
    /// Record a medical stock item.
    Stock(AddStockArgs),
    /// Register a platform user.
    User(AddUserArgs),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ViewArgs {
    #[arg(value_parser = parse_tab, default_value = "dashboard")]
    pub(crate) tab: ViewTab,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ReportShowArgs {
    pub(crate) id: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SubmitArgs {
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long = "type", value_enum, default_value_t = ReportTypeArg::Disease)]
    pub(crate) report_type: ReportTypeArg,
    #[arg(long)]
    pub(crate) symptoms: String,
    #[arg(long, value_enum, default_value_t = SeverityArg::Low)]
    pub(crate) severity: SeverityArg,
    #[arg(long)]
    pub(crate) address: Option<String>,
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub(crate) lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub(crate) lng: Option<f64>,
    #[arg(long)]
    pub(crate) anonymous: bool,
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct LocationArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) lng: f64,
    #[arg(long)]
    pub(crate) address: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct AddWaterArgs {
    #[command(flatten)]
    pub(crate) location: LocationArgs,
    #[arg(long)]
    pub(crate) tds: f64,
    #[arg(long)]
    pub(crate) ph: f64,
    #[arg(long)]
    pub(crate) turbidity: f64,
    #[arg(long)]
    pub(crate) chlorine: f64,
    #[arg(long)]
    pub(crate) tested_by: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct AddDoctorArgs {
    #[command(flatten)]
    pub(crate) location: LocationArgs,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) specialization: String,
    #[arg(long)]
    pub(crate) phone: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, default_value = "available")]
    pub(crate) availability: String,
    #[arg(long)]
    pub(crate) clinic: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct AddStockArgs {
    #[command(flatten)]
    pub(crate) location: LocationArgs,
    #[arg(long)]
    pub(crate) item: String,
    #[arg(long)]
    pub(crate) quantity: u32,
    #[arg(long)]
    pub(crate) unit: String,
    #[arg(long, help = "Expiry date as YYYY-MM-DD")]
    pub(crate) expires: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct AddUserArgs {
    #[command(flatten)]
    pub(crate) location: LocationArgs,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, value_enum, default_value_t = UserRoleArg::Citizen)]
    pub(crate) role: UserRoleArg,
    #[arg(long)]
    pub(crate) phone: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct WatchArgs {
    #[arg(long, default_value_t = 30, help = "Seconds between data refreshes")]
    pub(crate) refresh_secs: u64,
    #[arg(long, help = "Stop after this many refresh cycles")]
    pub(crate) cycles: Option<u32>,
    #[arg(long, help = "Seed for the simulated alert source")]
    pub(crate) seed: Option<u64>,
    #[arg(long, help = "Print Prometheus metrics on exit")]
    pub(crate) metrics: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ReportTypeArg {
    Disease,
    WaterQuality,
    Complaint,
}

impl From<ReportTypeArg> for ReportType {
    fn from(value: ReportTypeArg) -> Self {
        match value {
            ReportTypeArg::Disease => Self::Disease,
            ReportTypeArg::WaterQuality => Self::WaterQuality,
            ReportTypeArg::Complaint => Self::Complaint,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum SeverityArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Low => Self::Low,
            SeverityArg::Medium => Self::Medium,
            SeverityArg::High => Self::High,
            SeverityArg::Critical => Self::Critical,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum UserRoleArg {
    Citizen,
    Doctor,
    ClinicStaff,
    Government,
}

impl From<UserRoleArg> for UserRole {
    fn from(value: UserRoleArg) -> Self {
        match value {
            UserRoleArg::Citizen => Self::Citizen,
            UserRoleArg::Doctor => Self::Doctor,
            UserRoleArg::ClinicStaff => Self::ClinicStaff,
            UserRoleArg::Government => Self::Government,
        }
    }
}

fn parse_tab(input: &str) -> Result<ViewTab, String> {
    input
        .parse::<ViewTab>()
        .map_err(|err| err.detail())
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::View(_) => "view",
        Command::Report(_) => "report",
        Command::Submit(_) => "submit",
        Command::Add(AddCommand::Water(_)) => "add_water",
        Command::Add(AddCommand::Doctor(_)) => "add_doctor",
        Command::Add(AddCommand::Stock(_)) => "add_stock",
        Command::Add(AddCommand::User(_)) => "add_user",
        Command::Watch(_) => "watch",
        Command::Users => "users",
    }
}
