//! TUI rendering for calendar layouts.
//!
//! Extension trait that turns the core's layout values into colored
//! terminal text using owo_colors.

use eventcal_core::calendar::{MeetingSummary, Notification, NotificationLevel};
use eventcal_core::event::{CalendarItem, DEFAULT_COLOR, ItemKind};
use eventcal_core::utils::{format_duration_label, format_time_range};
use eventcal_core::view::month::{MAX_VISIBLE_PER_DAY, STACK_LAYERS, WEEKDAY_HEADERS};
use eventcal_core::view::{
    AgendaEntry, DayColumn, DayLayout, EmployeeLayout, EventChip, MobileLayout, MonthCell,
    MonthLayout, ViewLayout, WeekLayout,
};
use owo_colors::OwoColorize;

/// Character width of one month grid column.
const CELL_WIDTH: usize = 16;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Parse "#rrggbb" into its components.
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Paint text in a hex color, leaving it plain if the color is unusable.
fn paint(text: &str, color: &str) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
        None => text.to_string(),
    }
}

/// Truncate or pad to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn marker(chip: &EventChip) -> &'static str {
    if chip.is_meeting { "◆" } else { "●" }
}

impl Render for EventChip {
    fn render(&self) -> String {
        format!(
            "{} {} {} {}",
            paint(marker(self), &self.color),
            self.time.dimmed(),
            self.name,
            format!("[{}]", self.status).dimmed()
        )
    }
}

impl Render for AgendaEntry {
    fn render(&self) -> String {
        let mut line = format!("{} {}", self.chip.render(), self.duration.dimmed());
        if let Some(client) = &self.client {
            line.push_str(&format!(" {}", client.cyan()));
        }
        if !self.location.is_empty() {
            line.push_str(&format!(" {}", format!("@ {}", self.location).dimmed()));
        }
        line
    }
}

impl Render for ViewLayout {
    fn render(&self) -> String {
        match self {
            ViewLayout::Month(layout) => layout.render(),
            ViewLayout::Week(layout) => layout.render(),
            ViewLayout::Day(layout) => layout.render(),
            ViewLayout::Employee(layout) => layout.render(),
        }
    }
}

impl Render for MonthLayout {
    fn render(&self) -> String {
        let mut lines = vec![self.label.bold().to_string()];

        let header: String = WEEKDAY_HEADERS.iter().map(|d| fit(d, CELL_WIDTH)).collect();
        lines.push(header.dimmed().to_string());

        for week in self.weeks() {
            let mut day_row = String::new();
            for cell in &week {
                match cell {
                    MonthCell::Day(day) => {
                        let number = fit(&day.date.format("%-d").to_string(), CELL_WIDTH);
                        if day.is_today {
                            day_row.push_str(&number.reversed().to_string());
                        } else {
                            day_row.push_str(&number.bold().to_string());
                        }
                    }
                    MonthCell::Empty => day_row.push_str(&" ".repeat(CELL_WIDTH)),
                }
            }
            lines.push(day_row.trim_end().to_string());

            for slot in 0..MAX_VISIBLE_PER_DAY {
                let mut row = String::new();
                for cell in &week {
                    let chip = match cell {
                        MonthCell::Day(day) => day.chips.get(slot).map(|chip| (day, chip)),
                        MonthCell::Empty => None,
                    };
                    let Some((day, chip)) = chip else {
                        row.push_str(&" ".repeat(CELL_WIDTH));
                        continue;
                    };

                    // The last visible chip of an overflowing day is drawn as a
                    // stack with its badge.
                    let stacked = day.is_stacked() && slot + 1 == day.chips.len();
                    let suffix = match day.overflow_badge() {
                        Some(badge) if stacked => format!("{}{}", "]".repeat(STACK_LAYERS), badge),
                        _ => String::new(),
                    };
                    let name_width = CELL_WIDTH - 3 - suffix.chars().count();
                    row.push_str(&format!(
                        "{} {}{} ",
                        paint(marker(chip), &chip.color),
                        fit(&chip.name, name_width),
                        suffix.yellow()
                    ));
                }
                if !row.trim().is_empty() {
                    lines.push(row.trim_end().to_string());
                }
            }
        }

        lines.join("\n")
    }
}

fn render_column(column: &DayColumn, lines: &mut Vec<String>) {
    if column.blocks.is_empty() {
        lines.push(format!("   {}", "No events".dimmed()));
        return;
    }
    for block in &column.blocks {
        lines.push(format!("   {}", block.chip.render()));
    }
}

impl Render for WeekLayout {
    fn render(&self) -> String {
        let mut lines = vec![self.label.bold().to_string()];

        for column in &self.columns {
            lines.push(String::new());
            let heading = column.date.format("%a %b %-d").to_string();
            if column.is_today {
                lines.push(heading.reversed().to_string());
            } else {
                lines.push(heading.bold().to_string());
            }
            render_column(column, &mut lines);
        }

        lines.join("\n")
    }
}

impl Render for DayLayout {
    fn render(&self) -> String {
        let mut lines = vec![self.label.bold().to_string(), String::new()];

        for row in &self.hours {
            let blocks: Vec<_> = self.column.blocks_in_hour(row.hour).collect();
            if blocks.is_empty() {
                lines.push(row.label.dimmed().to_string());
                continue;
            }
            for (i, block) in blocks.iter().enumerate() {
                let label = if i == 0 { row.label.as_str() } else { "" };
                lines.push(format!("{:<5} {}", label, block.chip.render()));
            }
        }

        lines.join("\n")
    }
}

impl Render for EmployeeLayout {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for group in &self.groups {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            let color = group.employee.color.as_deref().unwrap_or(DEFAULT_COLOR);
            lines.push(paint(&group.employee.name, color).bold().to_string());
            if group.is_empty() {
                lines.push(format!("   {}", "Nothing scheduled".dimmed()));
            }
            for entry in &group.entries {
                lines.push(format!("   {} {}", fit(&entry.date_label, 10).dimmed(), entry.render()));
            }
        }

        if !self.unassigned.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("Unassigned".bold().to_string());
            for entry in &self.unassigned {
                lines.push(format!("   {} {}", fit(&entry.date_label, 10).dimmed(), entry.render()));
            }
        }

        if lines.is_empty() {
            return "No employees or events".dimmed().to_string();
        }
        lines.join("\n")
    }
}

impl Render for MobileLayout {
    fn render(&self) -> String {
        let mut lines = vec![self.month_label.bold().to_string()];

        for week in self.strip.chunks(7) {
            let mut row = String::new();
            for day in week {
                let Some(day) = day else {
                    row.push_str(&" ".repeat(5));
                    continue;
                };
                let number = format!("{:>3}", day.date.format("%-d"));
                let number = if day.is_selected {
                    number.reversed().to_string()
                } else if day.is_today {
                    number.underline().to_string()
                } else {
                    number
                };
                let dots: String = day.dots.iter().map(|c| paint("•", c)).collect();
                row.push_str(&format!("{}{} ", number, dots));
                row.push_str(&" ".repeat(1 + 2usize.saturating_sub(day.dots.len())));
            }
            lines.push(row.trim_end().to_string());
        }

        lines.push(String::new());
        lines.push(self.selected_label.bold().to_string());
        if self.agenda.is_empty() {
            lines.push(format!("   {}", "No events".dimmed()));
        }
        for entry in &self.agenda {
            lines.push(format!("   {}", entry.render()));
        }

        lines.join("\n")
    }
}

impl Render for MeetingSummary {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} {}", "◆".magenta(), self.name.bold()),
            format!("   {} {}", self.date_label, self.time.dimmed()),
        ];
        if !self.location.is_empty() {
            lines.push(format!("   {}", format!("@ {}", self.location).dimmed()));
        }
        if !self.participants.is_empty() {
            lines.push(format!("   With: {}", self.participants.join(", ")));
        }
        if let Some(notes) = &self.notes {
            lines.push(format!("   {}", notes.italic()));
        }
        lines.join("\n")
    }
}

impl Render for CalendarItem {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} {}", paint("●", self.color()), self.name.bold()),
            format!(
                "   {} {} {}",
                self.date().format("%a %b %-d, %Y"),
                format_time_range(self).dimmed(),
                format!("({})", format_duration_label(self)).dimmed()
            ),
            format!("   Status: {}", paint(self.status.label(), self.status.color())),
        ];

        if let Some(category) = &self.category {
            lines.push(format!("   Category: {}", paint(&category.name, &category.color)));
        }
        if let Some(client) = self.client() {
            lines.push(format!("   Client: {}", client.display_name().cyan()));
        }
        if !self.location.is_empty() {
            lines.push(format!("   Location: {}", self.location));
        }
        if let ItemKind::Event(details) = &self.kind {
            if let Some(budget) = details.budget {
                lines.push(format!("   Budget: {:.2}", budget));
            }
            if !details.assignments.is_empty() {
                let team: Vec<_> = details
                    .assignments
                    .iter()
                    .map(|a| match &a.role {
                        Some(role) => format!("{} ({})", a.employee_id, role),
                        None => a.employee_id.clone(),
                    })
                    .collect();
                lines.push(format!("   Team: {}", team.join(", ")));
            }
        }
        if !self.description.is_empty() {
            lines.push(String::new());
            lines.push(format!("   {}", self.description));
        }

        lines.join("\n")
    }
}

impl Render for Notification {
    fn render(&self) -> String {
        match self.level {
            NotificationLevel::Success => format!("{} {}", "✓".green(), self.message.green()),
            NotificationLevel::Error => format!("{} {}", "✗".red(), self.message.red()),
        }
    }
}
