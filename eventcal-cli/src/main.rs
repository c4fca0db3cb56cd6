mod commands;
mod render;
mod store;
mod utils;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use eventcal_core::config::CalendarConfig;
use eventcal_core::event::EventStatus;
use eventcal_core::filter::FilterAction;
use eventcal_core::view::ViewMode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "eventcal")]
#[command(about = "Browse and plan events, meetings and team schedules")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Args, Debug, Default)]
struct NavArgs {
    /// Move forward this many periods
    #[arg(long, default_value_t = 0)]
    next: u32,

    /// Move back this many periods
    #[arg(long, default_value_t = 0)]
    prev: u32,
}

impl NavArgs {
    fn steps(&self) -> i32 {
        self.next as i32 - self.prev as i32
    }
}

#[derive(Args, Debug, Default)]
struct ViewArgs {
    #[command(flatten)]
    nav: NavArgs,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only show events with this status (repeatable)
    #[arg(long)]
    status: Vec<String>,

    /// Only show events in this category (repeatable)
    #[arg(long)]
    category: Vec<String>,

    /// Only show events for this client id, name or alias (repeatable)
    #[arg(long)]
    client: Vec<String>,

    /// Only show items involving this employee (repeatable)
    #[arg(long)]
    employee: Vec<String>,

    /// Only show items I created
    #[arg(long)]
    mine: bool,

    /// Only show events I am assigned to, and meetings I attend
    #[arg(long)]
    assigned: bool,
}

impl FilterArgs {
    fn actions(&self) -> Vec<FilterAction> {
        let mut actions: Vec<FilterAction> = Vec::new();
        actions.extend(
            self.status
                .iter()
                .map(|s| FilterAction::ToggleStatus(EventStatus::from(s.as_str()))),
        );
        actions.extend(self.category.iter().cloned().map(FilterAction::ToggleCategory));
        actions.extend(self.client.iter().cloned().map(FilterAction::ToggleClient));
        actions.extend(self.employee.iter().cloned().map(FilterAction::ToggleEmployee));
        if self.mine {
            actions.push(FilterAction::ToggleMyEvents);
        }
        if self.assigned {
            actions.push(FilterAction::ToggleAssignedToMe);
        }
        actions
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Month grid
    Month(ViewArgs),
    /// Week of hour-positioned events
    Week(ViewArgs),
    /// Single day, hour by hour
    Day(ViewArgs),
    /// Events grouped by assigned employee
    Team(FilterArgs),
    /// Day strip with the selected day's events
    Agenda {
        /// Show the whole month in the strip
        #[arg(long)]
        month: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// All events on one date
    More {
        day: NaiveDate,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show a meeting summary or event details
    Open { id: String },
    /// List categories, clients, employees and statuses
    Options,
    /// Create a meeting
    Meeting(commands::new::MeetingArgs),
    /// Create a business or individual event
    Event(commands::new::EventArgs),
}

fn init_tracing(debug: bool) {
    let env_filter = if debug {
        EnvFilter::new("eventcal=debug,eventcal_core=debug,warn")
    } else {
        EnvFilter::try_from_env("EVENTCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = CalendarConfig::load()?;
    let today = Local::now().date_naive();

    let (mode, filters) = match &cli.command {
        Some(Commands::Month(args)) => (ViewMode::Month, args.filters.actions()),
        Some(Commands::Week(args)) => (ViewMode::Week, args.filters.actions()),
        Some(Commands::Day(args)) => (ViewMode::Day, args.filters.actions()),
        Some(Commands::Team(filters)) => (ViewMode::Employee, filters.actions()),
        Some(Commands::Agenda { filters, .. }) | Some(Commands::More { filters, .. }) => {
            (ViewMode::Day, filters.actions())
        }
        _ => (config.default_view, Vec::new()),
    };

    let mut calendar = commands::mount(&config, today, mode, filters).await?;
    if let Some(date) = cli.date {
        calendar.go_to(date);
    }

    match cli.command {
        None | Some(Commands::Team(_)) => commands::view::run(&mut calendar, today, 0),
        Some(Commands::Month(args)) | Some(Commands::Week(args)) | Some(Commands::Day(args)) => {
            commands::view::run(&mut calendar, today, args.nav.steps())
        }
        Some(Commands::Agenda { month, .. }) => commands::view::agenda(&calendar, today, month),
        Some(Commands::More { day, .. }) => commands::view::more(&mut calendar, today, day),
        Some(Commands::Open { id }) => commands::open::run(&mut calendar, today, &id),
        Some(Commands::Options) => commands::options::run(&calendar),
        Some(Commands::Meeting(args)) => commands::new::meeting(&mut calendar, args).await,
        Some(Commands::Event(args)) => commands::new::event(&mut calendar, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn filter_flags_become_actions() {
        let cli = Cli::parse_from([
            "eventcal", "week", "--status", "offer_sent", "--client", "Acme", "--mine",
        ]);
        let Some(Commands::Week(args)) = cli.command else {
            panic!("expected week command");
        };
        assert_eq!(
            args.filters.actions(),
            vec![
                FilterAction::ToggleStatus(EventStatus::OfferSent),
                FilterAction::ToggleClient("Acme".into()),
                FilterAction::ToggleMyEvents,
            ]
        );
    }

    #[test]
    fn mine_flag_is_creator_only() {
        let command = Cli::command();
        let week = command.find_subcommand("week").unwrap();
        let mine = week.get_arguments().find(|a| a.get_id() == "mine").unwrap();
        assert_eq!(
            mine.get_help().map(|h| h.to_string()).as_deref(),
            Some("Only show items I created")
        );

        let cli = Cli::parse_from(["eventcal", "week", "--mine"]);
        let Some(Commands::Week(args)) = cli.command else {
            panic!("expected week command");
        };
        assert_eq!(args.filters.actions(), vec![FilterAction::ToggleMyEvents]);
    }

    #[test]
    fn navigation_steps() {
        let cli = Cli::parse_from(["eventcal", "month", "--prev", "2"]);
        match cli.command {
            Some(Commands::Month(args)) => assert_eq!(args.nav.steps(), -2),
            _ => panic!("expected month command"),
        }
    }
}
