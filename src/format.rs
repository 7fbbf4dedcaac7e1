//! Human-readable formatting of port mappings and creation times.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};

use crate::runtime::PortBinding;

/// Host IP shown when a binding does not name one.
const DEFAULT_HOST_IP: &str = "0.0.0.0";

/// Formats a container's port map as `host_ip:host_port->container_port`
/// entries joined by `", "`.
///
/// Keys are sorted as text so the output is stable. A port with no host
/// bindings (exposed but not published) is printed bare.
pub fn format_ports(ports: &HashMap<String, Vec<PortBinding>>) -> String {
    let mut keys: Vec<&String> = ports.keys().collect();
    keys.sort();

    let mut entries = Vec::new();
    for port in keys {
        let bindings = &ports[port];
        if bindings.is_empty() {
            entries.push(port.clone());
            continue;
        }
        for binding in bindings {
            let host_ip = binding
                .host_ip
                .as_deref()
                .filter(|ip| !ip.is_empty())
                .unwrap_or(DEFAULT_HOST_IP);
            let host_port = binding.host_port.as_deref().unwrap_or_default();
            entries.push(format!("{host_ip}:{host_port}->{port}"));
        }
    }
    entries.join(", ")
}

/// [`format_relative`] against the current wall-clock time.
pub fn format_created(timestamp: &str) -> String {
    format_relative(timestamp, Utc::now())
}

/// Describes how long before `now` the RFC 3339 `timestamp` lies.
///
/// Buckets are half-open on the elapsed time: under a minute is
/// `"Just now"`, then minutes, hours, `"Yesterday"` below 48 hours, days
/// below a week, and an absolute date such as `"Mar 4, 2024 at 3:07 PM"`
/// beyond that. A timestamp that does not parse is returned unchanged.
pub fn format_relative(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(created) = parse_timestamp(timestamp) else {
        return timestamp.to_owned();
    };

    let elapsed = now.signed_duration_since(created);

    if elapsed < TimeDelta::minutes(1) {
        "Just now".to_owned()
    } else if elapsed < TimeDelta::hours(1) {
        count_ago(elapsed.num_minutes(), "minute")
    } else if elapsed < TimeDelta::hours(24) {
        count_ago(elapsed.num_hours(), "hour")
    } else if elapsed < TimeDelta::hours(48) {
        "Yesterday".to_owned()
    } else if elapsed < TimeDelta::days(7) {
        format!("{} days ago", elapsed.num_days())
    } else {
        created.format("%b %-d, %Y at %-I:%M %p").to_string()
    }
}

/// Strict RFC 3339: an upper-case `T` separator, optional fractional
/// seconds, and either an upper-case `Z` or a `±hh:mm` offset.
fn parse_timestamp(timestamp: &str) -> Option<DateTime<FixedOffset>> {
    const LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    match timestamp.strip_suffix('Z') {
        Some(utc) => NaiveDateTime::parse_from_str(utc, LAYOUT)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset()),
        None => DateTime::parse_from_str(timestamp, &format!("{LAYOUT}%:z")).ok(),
    }
}

fn count_ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SecondsFormat, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn ago(delta: TimeDelta) -> String {
        let ts = (now() - delta).to_rfc3339_opts(SecondsFormat::Nanos, true);
        format_relative(&ts, now())
    }

    fn binding(ip: Option<&str>, port: &str) -> PortBinding {
        PortBinding { host_ip: ip.map(str::to_owned), host_port: Some(port.to_owned()) }
    }

    #[test]
    fn relative_buckets() {
        assert_eq!(ago(TimeDelta::seconds(30)), "Just now");
        assert_eq!(ago(TimeDelta::seconds(59)), "Just now");
        assert_eq!(ago(TimeDelta::minutes(1)), "1 minute ago");
        assert_eq!(ago(TimeDelta::minutes(59)), "59 minutes ago");
        assert_eq!(ago(TimeDelta::minutes(60)), "1 hour ago");
        assert_eq!(ago(TimeDelta::hours(5)), "5 hours ago");
        assert_eq!(ago(TimeDelta::hours(24)), "Yesterday");
        assert_eq!(ago(TimeDelta::hours(47)), "Yesterday");
        assert_eq!(ago(TimeDelta::hours(48)), "2 days ago");
        assert_eq!(ago(TimeDelta::hours(90)), "3 days ago");
    }

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(ago(TimeDelta::minutes(1) - TimeDelta::nanoseconds(1)), "Just now");
        assert_eq!(ago(TimeDelta::hours(1) - TimeDelta::nanoseconds(1)), "59 minutes ago");
        assert_eq!(ago(TimeDelta::days(7) - TimeDelta::seconds(1)), "6 days ago");
    }

    #[test]
    fn older_than_a_week_is_absolute() {
        assert_eq!(ago(TimeDelta::days(10)), "Jun 5, 2024 at 12:00 PM");
        assert_eq!(ago(TimeDelta::days(7)), "Jun 8, 2024 at 12:00 PM");
        assert_eq!(
            format_relative("2023-01-09T07:05:00.123456789Z", now()),
            "Jan 9, 2023 at 7:05 AM"
        );
    }

    #[test]
    fn absolute_date_keeps_the_source_offset() {
        assert_eq!(
            format_relative("2024-01-02T23:30:00+02:00", now()),
            "Jan 2, 2024 at 11:30 PM"
        );
    }

    #[test]
    fn future_timestamps_are_just_now() {
        assert_eq!(ago(-TimeDelta::hours(3)), "Just now");
    }

    #[test]
    fn unparseable_timestamp_is_returned_unchanged() {
        assert_eq!(format_relative("yesterday-ish", now()), "yesterday-ish");
        assert_eq!(format_relative("", now()), "");
    }

    #[test]
    fn lenient_rfc3339_forms_are_returned_unchanged() {
        for ts in [
            "2024-06-15 11:59:30Z",
            "2024-06-15t11:59:30Z",
            "2024-06-15T11:59:30z",
            "2024-06-15t11:59:30z",
            "2024-06-15T11:59:30",
        ] {
            assert_eq!(format_relative(ts, now()), ts);
        }
    }

    #[test]
    fn accepts_fractions_and_offsets() {
        assert_eq!(format_relative("2024-06-15T11:59:30Z", now()), "Just now");
        assert_eq!(format_relative("2024-06-15T11:50:00.5Z", now()), "9 minutes ago");
        assert_eq!(format_relative("2024-06-15T09:00:00-02:00", now()), "1 hour ago");
    }

    #[test]
    fn no_ports_is_empty() {
        assert_eq!(format_ports(&HashMap::new()), "");
    }

    #[test]
    fn exposed_port_without_binding_is_bare() {
        let ports = HashMap::from([("80/tcp".to_owned(), vec![])]);
        assert_eq!(format_ports(&ports), "80/tcp");
    }

    #[test]
    fn missing_host_ip_defaults_to_any() {
        let ports = HashMap::from([("80/tcp".to_owned(), vec![binding(Some(""), "8080")])]);
        assert_eq!(format_ports(&ports), "0.0.0.0:8080->80/tcp");

        let ports = HashMap::from([("80/tcp".to_owned(), vec![binding(None, "8080")])]);
        assert_eq!(format_ports(&ports), "0.0.0.0:8080->80/tcp");
    }

    #[test]
    fn ports_sort_as_text_and_expand_every_binding() {
        let ports = HashMap::from([
            ("9000/tcp".to_owned(), vec![]),
            (
                "443/tcp".to_owned(),
                vec![binding(Some("0.0.0.0"), "8443"), binding(Some("::"), "8443")],
            ),
            ("10000/udp".to_owned(), vec![binding(Some("127.0.0.1"), "10000")]),
        ]);
        assert_eq!(
            format_ports(&ports),
            "127.0.0.1:10000->10000/udp, 0.0.0.0:8443->443/tcp, :::8443->443/tcp, 9000/tcp"
        );
    }
}
