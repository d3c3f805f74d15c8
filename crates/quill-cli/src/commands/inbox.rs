use crate::support::{load_json_or_exit, print_json};
use chrono::{Local, TimeZone, Utc};
use quill_kernel::da_to_datetime;
use quill_notify::{
    DatedTimebox, Inbox, InboxSnapshot, IndexedNotification, MemorySource, NotifIndex,
    NotificationIndex, NotifyConfig, build_inbox,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::process;
use tracing::debug;

pub struct Args {
    pub notifications: String,
    pub groups: Vec<String>,
    pub associations: Option<String>,
    pub archive: bool,
    pub utc: bool,
    pub config: Option<String>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InboxView {
    archive: bool,
    unread: usize,
    inbox: Inbox,
}

pub fn run(args: Args) {
    let config = match &args.config {
        Some(path) => NotifyConfig::load(path).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(1);
        }),
        None => NotifyConfig::default(),
    };
    let snapshot: InboxSnapshot = load_json_or_exit(&args.notifications, "inbox snapshot");
    let associations: BTreeMap<String, String> = match &args.associations {
        Some(path) => load_json_or_exit(path, "associations"),
        None => BTreeMap::new(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });

    let index = NotificationIndex::new(MemorySource::from_snapshot(snapshot), config);
    // Live is always loaded so the unread count is meaningful.
    let sides: &[bool] = if args.archive { &[false, true] } else { &[false] };
    runtime.block_on(async {
        for &archived in sides {
            let mut pages = 0;
            while index.fetch_more(archived).await > 0 {
                pages += 1;
            }
            debug!(pages, archived, "replayed inbox snapshot");
        }
    });

    let notifications = index.snapshot(args.archive);
    let inbox = if args.utc {
        build_inbox(&notifications, &args.groups, &associations, &Utc)
    } else {
        build_inbox(&notifications, &args.groups, &associations, &Local)
    };
    let view = InboxView {
        archive: args.archive,
        unread: index.unread_count(),
        inbox,
    };

    if args.json {
        print_json(&view);
        return;
    }

    println!(
        "quill inbox ({})",
        if view.archive { "archive" } else { "live" }
    );
    println!("  unread: {}", view.unread);
    if view.inbox.is_empty() {
        println!("  (no notifications)");
        return;
    }
    if args.utc {
        render(&view.inbox, &Utc);
    } else {
        render(&view.inbox, &Local);
    }
}

fn render<Tz: TimeZone>(inbox: &Inbox, tz: &Tz)
where
    Tz::Offset: Display,
{
    if let Some(latest) = &inbox.latest {
        println!("  latest");
        print_timebox(latest, tz);
    }
    for section in &inbox.days {
        match section.day {
            Some(day) => println!("  {}", day.format("%Y-%m-%d")),
            None => println!("  (undated)"),
        }
        for timebox in &section.timeboxes {
            print_timebox(timebox, tz);
        }
    }
}

fn print_timebox<Tz: TimeZone>(timebox: &DatedTimebox, tz: &Tz)
where
    Tz::Offset: Display,
{
    for entry in &timebox.notifications {
        let at = da_to_datetime(&entry.notification.time)
            .map(|at| at.with_timezone(tz).format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string());
        println!(
            "    {} {at} {}",
            if entry.notification.read { " " } else { "*" },
            describe(entry)
        );
    }
}

fn describe(entry: &IndexedNotification) -> String {
    let count = entry.notification.contents.len();
    match &entry.index {
        NotifIndex::Graph {
            graph,
            description,
            ..
        } => format!("[graph] {graph} {} ({count})", description.as_str()),
        NotifIndex::Group { group, description } => {
            format!("[group] {group} {description} ({count})")
        }
        NotifIndex::Chat(chat) => format!("[chat] {chat} ({count})"),
    }
}
