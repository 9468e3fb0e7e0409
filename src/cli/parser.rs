use crate::export::{ExportDataset, ExportFormat};
use clap::{Parser, Subcommand};

/// Command-line interface definition for rWorkforce
/// Workforce operations CLI: routes, attendance, payroll, incidents and forms on SQLite
#[derive(Parser)]
#[command(
    name = "rworkforce",
    version = env!("CARGO_PKG_VERSION"),
    about = "Workforce operations CLI: field routes, attendance and payroll, incident triage and forms",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Organization to operate on (defaults to `organization` in the config)
    #[arg(global = true, long = "org")]
    pub org: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, help = "Only the last N rows")]
        limit: Option<usize>,

        #[arg(long, help = "Show recent outbound notifications instead")]
        notifications: bool,
    },

    /// Organizations and their payroll settings
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },

    /// Employees of the current organization
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },

    /// Points of sale visited by field staff
    Outlet {
        #[command(subcommand)]
        action: OutletAction,
    },

    /// Field routes, stops, assignments and weekly plans
    Route {
        #[command(subcommand)]
        action: RouteAction,
    },

    /// Daily check-in / check-out records
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },

    /// Compute payroll for a period
    Payroll {
        #[arg(
            long,
            value_name = "RANGE",
            help = "YYYY, YYYY-MM, YYYY-MM-DD or A:B (default: all)"
        )]
        range: Option<String>,

        #[arg(long, value_enum, requires = "file")]
        format: Option<ExportFormat>,

        #[arg(long, value_name = "FILE", help = "Write the report to an absolute path")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Group error logs into incidents and track them
    Incident {
        #[command(subcommand)]
        action: IncidentAction,
    },

    /// Render or send chat notifications
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },

    /// Dynamic forms and their responses
    Form {
        #[command(subcommand)]
        action: FormAction,
    },

    /// Outlet visits
    Visit {
        #[command(subcommand)]
        action: VisitAction,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export attendance, payroll or incident data
    Export {
        #[arg(value_enum)]
        dataset: ExportDataset,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum OrgAction {
    /// Show the organization and its settings
    Show,
    /// Create a new organization
    Add { name: String },
    /// Change one setting (e.g. member_rate 18, overtime_mode weekly)
    Set { key: String, value: String },
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    /// Add an employee
    Add {
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "member", help = "member | manager | admin")]
        role: String,
    },
    /// List employees
    List,
}

#[derive(Subcommand)]
pub enum OutletAction {
    /// Add an outlet
    Add {
        name: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// List outlets
    List,
}

#[derive(Subcommand)]
pub enum RouteAction {
    /// Create a route
    Add {
        name: String,

        #[arg(long, default_value = "planned")]
        status: String,

        #[arg(long, help = "Route date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "km", help = "Estimated distance in km")]
        distance: Option<f64>,

        #[arg(long = "minutes", help = "Estimated duration in minutes")]
        duration: Option<f64>,
    },
    /// Append a stop to a route
    Stop {
        route: i64,
        outlet: i64,

        #[arg(long = "minutes")]
        duration: Option<f64>,
    },
    /// Change route status
    Status { route: i64, status: String },
    /// Assign a route to a member
    Assign {
        route: i64,
        member: i64,

        #[arg(long, conflicts_with = "date", help = "Every week on this day (1=Mon .. 7=Sun)")]
        day: Option<i64>,

        #[arg(long, help = "On this date only (YYYY-MM-DD)")]
        date: Option<String>,
    },
    /// Remove an assignment
    Unassign { assignment: i64 },
    /// List routes with cost estimates
    List,
    /// Routes a member drives on a day
    Day {
        member: i64,

        #[arg(long, help = "Date (YYYY-MM-DD, default today)")]
        date: Option<String>,
    },
    /// Weekly plan and cost statistics for a member
    Week {
        member: i64,

        #[arg(long, help = "Any date of the week (default today)")]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AttendanceAction {
    /// Check a member in
    Checkin {
        member: i64,

        #[arg(long)]
        date: Option<String>,

        #[arg(long, help = "HH:MM (default now)")]
        time: Option<String>,
    },
    /// Check a member out
    Checkout {
        member: i64,

        #[arg(long)]
        date: Option<String>,

        #[arg(long, help = "HH:MM (default now)")]
        time: Option<String>,
    },
    /// Store a full record (import or correction)
    Record {
        member: i64,
        date: String,

        #[arg(long = "in")]
        check_in: Option<String>,

        #[arg(long = "out")]
        check_out: Option<String>,

        #[arg(long)]
        hours: Option<f64>,

        #[arg(long, help = "Precomputed overtime hours")]
        overtime: Option<f64>,

        #[arg(long, help = "present | absent | late | half_day")]
        status: Option<String>,
    },
    /// List records
    List {
        #[arg(long)]
        range: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum IncidentAction {
    /// Scan a JSON-lines log file
    Scan {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Do not e-mail alerts")]
        no_alert: bool,
    },
    /// List incidents
    List {
        #[arg(long, help = "Include resolved incidents")]
        all: bool,
    },
    /// Show one incident
    Show { id: i64 },
    /// Mark an incident resolved
    Resolve { id: i64 },
}

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List events and the variables their templates use
    Events,
    /// Print the payload for an event
    Render {
        #[arg(long)]
        event: String,

        #[arg(long, default_value = "slack")]
        dialect: String,

        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
    },
    /// Send an event to every configured webhook
    Send {
        #[arg(long)]
        event: String,

        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum FormAction {
    /// Create a form from a JSON definition file
    Create {
        #[arg(long, value_name = "FILE")]
        file: String,
    },
    /// List forms
    List,
    /// Preview a form
    Show { id: i64 },
    /// Validate answers without storing them
    Validate {
        #[arg(long)]
        form: i64,

        #[arg(long, value_name = "FILE")]
        answers: String,
    },
    /// Validate and store a response
    Submit {
        #[arg(long)]
        form: i64,

        #[arg(long)]
        member: i64,

        #[arg(long, value_name = "FILE")]
        answers: String,

        #[arg(long, help = "Open visit to complete with this response")]
        visit: Option<i64>,
    },
    /// List responses of a form
    Responses { id: i64 },
}

#[derive(Subcommand)]
pub enum VisitAction {
    /// Start a visit at an outlet
    Checkin {
        outlet: i64,
        member: i64,

        #[arg(long, help = "YYYY-MM-DD HH:MM (default now)")]
        at: Option<String>,
    },
    /// List visits
    List {
        #[arg(long)]
        member: Option<i64>,
    },
}
