//! Inbox view: group filtering and calendar-day sections.
//!
//! The newest timebox is shown as its own "latest" section. Every older
//! timebox is filtered by group, then bucketed by the calendar day of
//! its key in the viewer's time zone.

use chrono::{NaiveDate, TimeZone};
use quill_kernel::{BigUint, da_to_datetime};
use serde::Serialize;

use crate::notification::{IndexedNotification, NotifIndex, Notifications, Timebox};
use crate::source::AssociationLookup;

/// A timebox together with its bucket key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedTimebox {
    #[serde(with = "quill_kernel::decimal")]
    pub time: BigUint,
    pub notifications: Timebox,
}

/// Timeboxes that fall on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySection {
    /// `None` for keys that do not map to a date.
    pub day: Option<NaiveDate>,
    pub timeboxes: Vec<DatedTimebox>,
}

impl DaySection {
    pub fn notification_count(&self) -> usize {
        self.timeboxes.iter().map(|t| t.notifications.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Inbox {
    pub latest: Option<DatedTimebox>,
    pub days: Vec<DaySection>,
}

impl Inbox {
    pub fn is_empty(&self) -> bool {
        self.latest.is_none() && self.days.is_empty()
    }
}

/// Whether `entry` belongs to one of `groups`.
///
/// An empty `groups` admits everything. Chats are resolved through
/// `associations`; an unresolved chat is never admitted by a non-empty
/// filter.
pub fn admits(
    entry: &IndexedNotification,
    groups: &[String],
    associations: &impl AssociationLookup,
) -> bool {
    if groups.is_empty() {
        return true;
    }
    let group = match &entry.index {
        NotifIndex::Chat(chat) => associations.group_for_chat(chat),
        other => other.group(),
    };
    group.is_some_and(|group| groups.iter().any(|g| g == group))
}

/// Keep the notifications of `timebox` admitted by [`admits`].
pub fn filter_by_groups(
    mut timebox: Timebox,
    groups: &[String],
    associations: &impl AssociationLookup,
) -> Timebox {
    timebox.retain(|entry| admits(entry, groups, associations));
    timebox
}

/// Split descending timeboxes into runs sharing a calendar day in `tz`.
pub fn group_by_day<Tz: TimeZone>(
    timeboxes: impl IntoIterator<Item = DatedTimebox>,
    tz: &Tz,
) -> Vec<DaySection> {
    let mut sections: Vec<DaySection> = Vec::new();
    for timebox in timeboxes {
        let day = da_to_datetime(&timebox.time).map(|at| at.with_timezone(tz).date_naive());
        match sections.last_mut() {
            Some(section) if section.day == day => section.timeboxes.push(timebox),
            _ => sections.push(DaySection {
                day,
                timeboxes: vec![timebox],
            }),
        }
    }
    sections
}

/// Order a day's timeboxes newest first, and each timebox's
/// notifications newest first.
pub fn sort_within_day(section: &mut DaySection) {
    section.timeboxes.sort_by(|a, b| b.time.cmp(&a.time));
    for timebox in &mut section.timeboxes {
        sort_timebox(&mut timebox.notifications);
    }
}

fn sort_timebox(notifications: &mut Timebox) {
    notifications.sort_by(|a, b| b.notification.time.cmp(&a.notification.time));
}

/// Build the inbox view of `notifications`.
///
/// The newest timebox is returned unfiltered as `latest`. Older timeboxes
/// emptied by the filter are dropped, so every day has notifications.
pub fn build_inbox<Tz: TimeZone>(
    notifications: &Notifications,
    groups: &[String],
    associations: &impl AssociationLookup,
    tz: &Tz,
) -> Inbox {
    let mut entries = notifications.entries();

    let latest = entries.next().map(|(time, timebox)| {
        let mut notifications = timebox.clone();
        sort_timebox(&mut notifications);
        DatedTimebox {
            time: time.clone(),
            notifications,
        }
    });

    let older = entries.filter_map(|(time, timebox)| {
        let notifications = filter_by_groups(timebox.clone(), groups, associations);
        (!notifications.is_empty()).then(|| DatedTimebox {
            time: time.clone(),
            notifications,
        })
    });

    let mut days = group_by_day(older, tz);
    for section in &mut days {
        sort_within_day(section);
    }
    Inbox { latest, days }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{GraphDescription, Notification, NotificationContents};
    use chrono::{FixedOffset, Utc};
    use quill_kernel::unix_ms_to_da;
    use std::collections::BTreeMap;

    const JAN_1_2021_MS: u64 = 1_609_459_200_000;
    const HOUR_MS: u64 = 3_600_000;

    fn notification(index: NotifIndex, time: u64) -> IndexedNotification {
        IndexedNotification {
            index,
            notification: Notification {
                read: false,
                time: BigUint::from(time),
                contents: NotificationContents::Graph(Vec::new()),
            },
        }
    }

    fn graph(group: &str, time: u64) -> IndexedNotification {
        notification(
            NotifIndex::Graph {
                graph: "/ship/~zod/notes".to_string(),
                group: group.to_string(),
                description: GraphDescription::Comment,
                module: "publish".to_string(),
            },
            time,
        )
    }

    fn chat(path: &str, time: u64) -> IndexedNotification {
        notification(NotifIndex::Chat(path.to_string()), time)
    }

    fn associations() -> BTreeMap<String, String> {
        BTreeMap::from([("/~zod/general".to_string(), "g1".to_string())])
    }

    fn dated(ms: u64, notifications: Timebox) -> DatedTimebox {
        DatedTimebox {
            time: unix_ms_to_da(ms),
            notifications,
        }
    }

    #[test]
    fn empty_filter_admits_everything() {
        let timebox = vec![graph("g1", 1), chat("/unknown", 2)];
        let kept = filter_by_groups(timebox.clone(), &[], &());
        assert_eq!(kept, timebox);
    }

    #[test]
    fn filter_keeps_only_named_groups() {
        let timebox = vec![
            graph("g1", 1),
            graph("g2", 2),
            notification(
                NotifIndex::Group {
                    group: "g1".to_string(),
                    description: "add-members".to_string(),
                },
                3,
            ),
            chat("/~zod/general", 4),
            chat("/~nec/random", 5),
        ];
        let groups = vec!["g1".to_string()];
        let kept = filter_by_groups(timebox, &groups, &associations());

        let times: Vec<String> = kept
            .iter()
            .map(|e| e.notification.time.to_string())
            .collect();
        assert_eq!(times, vec!["1", "3", "4"]);
    }

    #[test]
    fn same_day_timeboxes_share_a_section() {
        let sections = group_by_day(
            vec![
                dated(JAN_1_2021_MS + 5 * HOUR_MS, vec![graph("g", 1)]),
                dated(JAN_1_2021_MS + HOUR_MS, vec![graph("g", 2)]),
                dated(JAN_1_2021_MS - HOUR_MS, vec![graph("g", 3)]),
            ],
            &Utc,
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].day, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(sections[0].timeboxes.len(), 2);
        assert!(sections[0].timeboxes[0].time > sections[0].timeboxes[1].time);
        assert_eq!(sections[1].day, NaiveDate::from_ymd_opt(2020, 12, 31));
    }

    #[test]
    fn day_boundaries_follow_the_time_zone() {
        let timeboxes = vec![
            dated(JAN_1_2021_MS + 2 * HOUR_MS, vec![graph("g", 1)]),
            dated(JAN_1_2021_MS - 2 * HOUR_MS, vec![graph("g", 2)]),
        ];
        assert_eq!(group_by_day(timeboxes.clone(), &Utc).len(), 2);

        let new_york = FixedOffset::west_opt(5 * 3600).expect("valid offset");
        let sections = group_by_day(timeboxes, &new_york);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].day, NaiveDate::from_ymd_opt(2020, 12, 31));
    }

    #[test]
    fn keys_before_the_epoch_are_dateless() {
        let sections = group_by_day(
            vec![
                dated(JAN_1_2021_MS, vec![graph("g", 1)]),
                DatedTimebox {
                    time: BigUint::from(42u8),
                    notifications: vec![graph("g", 2)],
                },
            ],
            &Utc,
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].day, None);
    }

    #[test]
    fn sort_orders_timeboxes_and_notifications_descending() {
        let mut section = DaySection {
            day: None,
            timeboxes: vec![
                dated(JAN_1_2021_MS, vec![graph("g", 1), graph("g", 9), graph("g", 5)]),
                dated(JAN_1_2021_MS + HOUR_MS, vec![graph("g", 2)]),
            ],
        };
        sort_within_day(&mut section);

        assert_eq!(section.timeboxes[0].time, unix_ms_to_da(JAN_1_2021_MS + HOUR_MS));
        let times: Vec<String> = section.timeboxes[1]
            .notifications
            .iter()
            .map(|e| e.notification.time.to_string())
            .collect();
        assert_eq!(times, vec!["9", "5", "1"]);
        assert_eq!(section.notification_count(), 4);
    }

    #[test]
    fn build_inbox_splits_latest_and_drops_filtered_days() {
        let notifications: Notifications = [
            (unix_ms_to_da(JAN_1_2021_MS + 3 * HOUR_MS), vec![graph("g2", 1), graph("g2", 4)]),
            (unix_ms_to_da(JAN_1_2021_MS + HOUR_MS), vec![graph("g1", 2)]),
            (unix_ms_to_da(JAN_1_2021_MS - 30 * HOUR_MS), vec![graph("g2", 3)]),
        ]
        .into_iter()
        .collect();

        let groups = vec!["g1".to_string()];
        let inbox = build_inbox(&notifications, &groups, &(), &Utc);

        let latest = inbox.latest.expect("latest section");
        assert_eq!(latest.notifications.len(), 2);
        assert_eq!(latest.notifications[0].notification.time, BigUint::from(4u8));

        assert_eq!(inbox.days.len(), 1);
        assert_eq!(inbox.days[0].day, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(inbox.days[0].notification_count(), 1);
    }

    #[test]
    fn empty_notifications_build_empty_inbox() {
        let inbox = build_inbox(&Notifications::new(), &[], &(), &Utc);
        assert!(inbox.is_empty());
    }
}
