use anyhow::Result;
use eventcal_core::calendar::Calendar;
use eventcal_core::event::{Client, DEFAULT_COLOR, EventStatus};
use owo_colors::OwoColorize;

/// List the values accepted by the filter flags.
pub fn run(calendar: &Calendar) -> Result<()> {
    let options = calendar.filter_options();

    println!("{}", "Statuses".bold());
    for status in EventStatus::ALL {
        println!("   {:<16} {}", status.as_str(), status.label().dimmed());
    }

    println!("\n{}", "Categories".bold());
    for category in &options.categories {
        println!("   {:<16} {}", category.id, category.name.dimmed());
    }

    println!("\n{}", "Clients".bold());
    for client in &options.clients {
        let kind = match client {
            Client::Organization { .. } => "organization",
            Client::Contact { .. } => "contact",
        };
        println!(
            "   {:<16} {} {}",
            client.id(),
            client.display_name(),
            format!("({})", kind).dimmed()
        );
    }

    println!("\n{}", "Employees".bold());
    for employee in &options.employees {
        let color = employee.color.as_deref().unwrap_or(DEFAULT_COLOR);
        println!("   {:<16} {} {}", employee.id, employee.name, color.dimmed());
    }

    match calendar.current_user() {
        Some(user) => println!("\nSigned in as {}", user.bold()),
        None => println!("\n{}", "No current user; --mine and --assigned match nothing".dimmed()),
    }

    Ok(())
}
