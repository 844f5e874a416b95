//! Terminal presentation for the dashboard.
//!
//! Sections render in layout order: top slot first, then the left and
//! right columns flattened top to bottom. Every section has a degraded
//! form so a partly-failed refresh still paints a full deck.

use chrono::Local;
use daydeck_core::state::Dashboard;
use daydeck_core::task::{Task, TaskKind};
use daydeck_core::{SectionId, Slot};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::feeds::mail::Mail;
use crate::feeds::{Agenda, DashboardData, NewsItem, Weather};

const MAILS_PER_GROUP: usize = 4;

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();

    // The template is a literal; an error here is a programming mistake.
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap(),
    );

    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    spinner
}

pub fn render_dashboard(dashboard: &Dashboard, data: &DashboardData, briefing: Option<&str>) {
    render_header(data.weather.as_ref());

    for slot in Slot::ALL {
        for section in dashboard.layout().slot(slot) {
            println!();
            render_section(*section, dashboard, data, briefing);
        }
    }
}

fn render_header(weather: Option<&Weather>) {
    let now = Local::now();
    let date = now.format("%A, %B %-d").to_string();
    let time = now.format("%H:%M").to_string();

    match weather {
        Some(weather) => println!(
            "{}  {}  {}",
            date.bold(),
            time.dimmed(),
            format_weather(weather).dimmed()
        ),
        None => println!("{}  {}", date.bold(), time.dimmed()),
    }
}

fn format_weather(weather: &Weather) -> String {
    let mut parts = vec![format!(
        "{:.1}°C {}",
        weather.temperature_c,
        weather.describe()
    )];

    if let Some(pm2_5) = weather.pm2_5 {
        parts.push(format!("PM2.5 {:.0}", pm2_5));
    }
    if let Some(pm10) = weather.pm10 {
        parts.push(format!("PM10 {:.0}", pm10));
    }

    parts.join(" · ")
}

fn render_section(
    section: SectionId,
    dashboard: &Dashboard,
    data: &DashboardData,
    briefing: Option<&str>,
) {
    match section {
        SectionId::Comms => render_comms(&data.mail.company, &data.mail.personal),
        SectionId::Tasks => {
            render_task_list(dashboard, TaskKind::Today);
            println!();
            render_task_list(dashboard, TaskKind::Checklist);
        }
        SectionId::News => render_news(&data.news, briefing),
        SectionId::Yesterday => render_task_list(dashboard, TaskKind::Yesterday),
        SectionId::Agenda => render_agenda(&data.agenda),
        SectionId::Logout => {
            println!("{}", "TERMINATE SESSION".dimmed());
            println!("   {}", "daydeck lock".dimmed());
        }
    }
}

// --- comms ---

fn render_comms(company: &[Mail], personal: &[Mail]) {
    println!("{}", "COMMUNICATIONS".bold());

    let naver_company: Vec<&Mail> = company.iter().filter(|m| m.is_naver).collect();
    let naver_personal: Vec<&Mail> = personal.iter().filter(|m| m.is_naver).collect();

    render_mail_group("Work Gmail", &company.iter().collect::<Vec<_>>(), false);
    render_mail_group("Personal Gmail", &personal.iter().collect::<Vec<_>>(), false);
    render_mail_group("Work Naver", &naver_company, true);
    render_mail_group("Personal Naver", &naver_personal, true);
}

fn render_mail_group(title: &str, mails: &[&Mail], naver_auto: bool) {
    println!();
    if mails.is_empty() {
        // The Naver groups are derived views, so "empty" means no intel
        // routed there rather than a clear inbox.
        let empty = if naver_auto { "· intel ready" } else { "· protocol clear" };
        println!("   {} {}", title.bold(), empty.dimmed());
        return;
    }

    println!("   {} {}", title.bold(), format!("({})", mails.len()).dimmed());

    for mail in mails.iter().take(MAILS_PER_GROUP) {
        println!("     {}  {}", mail.from.bold(), mail.subject);
        if !mail.link.is_empty() {
            println!("     {}", mail.link.dimmed());
        }
    }

    if mails.len() > MAILS_PER_GROUP {
        println!("     {}", format!("+{} more", mails.len() - MAILS_PER_GROUP).dimmed());
    }
}

// --- tasks ---

fn render_task_list(dashboard: &Dashboard, kind: TaskKind) {
    let tasks: Vec<&Task> = dashboard.tasks_of(kind).collect();

    println!("{}", kind.title().to_uppercase().bold());

    if tasks.is_empty() {
        println!("   {}", "No active assignments".dimmed());
        return;
    }

    for task in tasks {
        println!("   {}", format_task_line(task));
    }
}

pub fn format_task_line(task: &Task) -> String {
    let id = short_id(&task.id);

    if task.completed {
        format!(
            "{} {}  {}",
            "[x]".green(),
            id.dimmed(),
            task.text.strikethrough().dimmed()
        )
    } else {
        format!("{} {}  {}", "[ ]", id.dimmed(), task.text)
    }
}

/// Enough of the id to resolve it back with `task done <id>`. Remote ids
/// are not guaranteed ASCII, so cut on a char boundary.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

// --- news ---

fn render_news(news: &[NewsItem], briefing: Option<&str>) {
    println!("{}", "STRATEGIC INTELLIGENCE".bold());

    if let Some(text) = briefing {
        println!("   {}", text.italic());
        println!();
    }

    if news.is_empty() {
        println!("   {}", "No headlines. Add [[news]] searches to the config.".dimmed());
        return;
    }

    for item in news {
        println!(
            "   {} {}",
            item.source.to_uppercase().dimmed(),
            item.pub_date.dimmed()
        );
        println!("   {}", item.title);
        println!("   {}", item.link.dimmed());
        println!();
    }
}

// --- agenda ---

fn render_agenda(agenda: &Agenda) {
    println!("{}", "AGENDA".bold());

    match agenda {
        Agenda::Events(events) if events.is_empty() => {
            println!("   {}", "No scheduled engagements for this date".dimmed());
        }
        Agenda::Events(events) => {
            for event in events {
                println!("   {}  {}", event.start.label().dimmed(), event.summary);
                if let Some(location) = &event.location {
                    println!("          {}", location.dimmed());
                }
            }
        }
        Agenda::EmbedOnly(url) => {
            println!("   {}", "No account connected; calendar is view-only:".dimmed());
            println!("   {}", url.dimmed());
        }
        Agenda::NeedsReauth(account) => {
            println!(
                "   {}",
                format!("Session for {account} expired. Run `daydeck auth google`.").red()
            );
        }
        Agenda::Unavailable => {
            println!("   {}", "Agenda unavailable this refresh".red());
        }
        Agenda::NotConfigured => {
            println!(
                "   {}",
                "Connect a calendar with `daydeck auth google`".dimmed()
            );
        }
    }
}
