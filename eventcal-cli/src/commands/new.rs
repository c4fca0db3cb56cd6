use anyhow::{Context, Result, anyhow, bail};
use chrono::{Duration, NaiveDateTime};
use clap::Args;
use eventcal_core::calendar::{Calendar, CreateMenu, CreateOption};
use eventcal_core::event::EventStatus;
use eventcal_core::record::parse_timestamp;
use eventcal_core::wizard::WizardStep;
use owo_colors::OwoColorize;

use super::flush_notifications;
use crate::render::Render;
use crate::utils::tui::create_spinner;

#[derive(Args, Debug)]
pub struct MeetingArgs {
    pub name: String,

    /// Start date/time (e.g. "2025-03-20T15:00")
    #[arg(short, long)]
    pub start: String,

    /// End date/time, defaults to one hour after the start
    #[arg(short, long)]
    pub end: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    /// Employee id of a participant (repeatable)
    #[arg(short = 'w', long = "with")]
    pub participants: Vec<String>,

    #[arg(short, long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    pub name: String,

    /// Client id, name or alias
    #[arg(short, long)]
    pub client: String,

    /// Bill a private contact instead of an organization
    #[arg(long)]
    pub individual: bool,

    /// Start date/time (e.g. "2025-03-20T15:00")
    #[arg(short, long)]
    pub start: String,

    /// End date/time, defaults to one hour after the start
    #[arg(short, long)]
    pub end: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Initial status (e.g. "offer_sent"), defaults to inquiry
    #[arg(long)]
    pub status: Option<String>,

    /// Category id
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub budget: Option<f64>,

    /// Team member as "employee[:hours[:role]]" (repeatable)
    #[arg(short, long = "assign")]
    pub assignments: Vec<String>,
}

fn parse_range(start: &str, end: Option<&str>) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let start = parse_timestamp(start).with_context(|| format!("Invalid start '{}'", start))?;
    let end = match end {
        Some(raw) => parse_timestamp(raw).with_context(|| format!("Invalid end '{}'", raw))?,
        None => start
            .checked_add_signed(Duration::hours(1))
            .ok_or_else(|| anyhow!("Start '{}' is out of range", start))?,
    };
    Ok((start, end))
}

/// Split "employee[:hours[:role]]".
fn parse_assignment(raw: &str) -> Result<(String, Option<f64>, Option<String>)> {
    let mut parts = raw.splitn(3, ':');
    let employee = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("Empty assignment"))?;
    let hours = parts
        .next()
        .filter(|s| !s.is_empty())
        .map(|h| h.parse::<f64>())
        .transpose()
        .with_context(|| format!("Invalid hours in assignment '{}'", raw))?;
    let role = parts.next().filter(|s| !s.is_empty()).map(String::from);
    Ok((employee.to_string(), hours, role))
}

fn non_empty(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

pub async fn meeting(calendar: &mut Calendar, args: MeetingArgs) -> Result<()> {
    let (start, end) = parse_range(&args.start, args.end.as_deref())?;
    let date = start.date();

    if let CreateMenu::TypeSelector(_) = calendar.open_create(date) {
        calendar.choose_create(CreateOption::Meeting, date);
    }

    let form = calendar
        .meeting_form_mut()
        .ok_or_else(|| anyhow!("Meeting form did not open"))?;
    form.name = args.name;
    form.start = start;
    form.end = Some(end);
    form.location = non_empty(args.location);
    form.notes = non_empty(args.notes);
    for participant in &args.participants {
        if !form.participants.contains(participant) {
            form.toggle_participant(participant);
        }
    }

    let spinner = create_spinner("Creating meeting".into());
    let result = calendar.submit_meeting().await;
    spinner.finish_and_clear();

    flush_notifications(calendar);
    let item = result?;
    println!("{}", item.render());
    Ok(())
}

pub async fn event(calendar: &mut Calendar, args: EventArgs) -> Result<()> {
    let (start, end) = parse_range(&args.start, args.end.as_deref())?;
    let date = start.date();

    if calendar.open_create(date) == CreateMenu::MeetingOnly {
        calendar.close_modal();
        bail!(
            "You may only create meetings.\n\n\
            Create one with:\n  \
            eventcal meeting <name> --start <when>"
        );
    }

    let option = if args.individual {
        CreateOption::Individual
    } else {
        CreateOption::Business
    };
    calendar.choose_create(option, date);

    let client = calendar
        .filter_options()
        .clients
        .iter()
        .find(|c| c.matches(&args.client))
        .cloned()
        .ok_or_else(|| anyhow!("Client '{}' not found. See `eventcal options`", args.client))?;

    let status = match args.status {
        Some(raw) => {
            let status = EventStatus::from(raw.as_str());
            if !status.is_known() {
                bail!("Unknown status '{}'. See `eventcal options`", raw);
            }
            status
        }
        None => EventStatus::Inquiry,
    };

    let assignments = args
        .assignments
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;

    let wizard = calendar
        .event_wizard_mut()
        .ok_or_else(|| anyhow!("Event wizard did not open"))?;

    wizard.client = Some(client);
    wizard.next()?;

    wizard.name = args.name;
    wizard.start = start;
    wizard.end = Some(end);
    wizard.location = non_empty(args.location);
    wizard.description = non_empty(args.description);
    wizard.status = status;
    wizard.category_id = args.category;
    wizard.budget = args.budget;
    wizard.next()?;

    for (employee, hours, role) in assignments {
        wizard.assign(employee, role, hours)?;
    }
    if wizard.next()? != WizardStep::Review {
        bail!("Event wizard stopped before review");
    }

    let spinner = create_spinner("Creating event".into());
    let result = calendar.submit_event().await;
    spinner.finish_and_clear();

    flush_notifications(calendar);
    let item = result?;
    println!("{}", item.render());
    println!("{}", format!("id: {}", item.id).dimmed());
    Ok(())
}
