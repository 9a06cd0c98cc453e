use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use clap::Args;
use owo_colors::OwoColorize;

use plancal_core::recurrence::expand_series;
use plancal_core::validation::validate_form;
use plancal_core::{Clock, EventForm, PlanCalConfig, RecurrenceRule, RepeatType, SystemClock};

use super::{collect_conflicts, confirm_overlaps, parse_date_arg, parse_repeat_arg, parse_time_arg};
use crate::client::Client;

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    pub title: String,

    /// Day of the event (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub date: NaiveDate,

    /// Start time (HH:MM)
    #[arg(short, long, value_parser = parse_time_arg)]
    pub start: String,

    /// End time (HH:MM). Defaults to one hour after the start
    #[arg(short, long, value_parser = parse_time_arg, conflicts_with = "duration")]
    pub end: Option<String>,

    /// Length instead of an end time (e.g. "30m", "1h 30m")
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(short, long, default_value = "")]
    pub location: String,

    #[arg(short, long, default_value = "")]
    pub category: String,

    /// Minutes before the start to notify
    #[arg(short, long, default_value_t = plancal_core::DEFAULT_NOTIFICATION_MINUTES)]
    pub notify: u32,

    /// Repeat: daily, weekly, monthly or yearly
    #[arg(short, long, value_parser = parse_repeat_arg)]
    pub repeat: Option<RepeatType>,

    /// Repeat every N days/weeks/months/years
    #[arg(short, long, default_value_t = 1)]
    pub interval: u32,

    /// Last day of the repetition (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg, requires = "repeat")]
    pub until: Option<NaiveDate>,

    /// Save even if the event overlaps existing ones
    #[arg(short, long)]
    pub force: bool,
}

pub async fn run(args: AddArgs, client: &Client, config: &PlanCalConfig) -> Result<()> {
    let form = build_form(&args)?;
    let is_repeating = args.repeat.is_some();
    validate_form(&form, is_repeating)?;

    let instances = if is_repeating {
        expand_series(&form, SystemClock.now(), config.horizon()?)
    } else {
        vec![form.clone()]
    };
    tracing::debug!(count = instances.len(), "prepared instances");

    let existing = client.list_events().await?;
    let conflicts = collect_conflicts(config.overlap_policy, &instances, &existing);

    if !conflicts.is_empty() && !args.force && !confirm_overlaps(&conflicts)? {
        println!("{}", "취소되었습니다.".dimmed());
        return Ok(());
    }

    if is_repeating {
        let created = client.create_events(&instances).await?;
        println!("{}", format!("일정 {}개가 추가되었습니다.", created.len()).green());
    } else {
        let created = client.create_event(&form).await?;
        println!("{} {}", "일정이 추가되었습니다.".green(), format!("[{}]", created.id).dimmed());
    }

    Ok(())
}

/// Turn the arguments into a form. Times have already been normalized.
fn build_form(args: &AddArgs) -> Result<EventForm> {
    let end = match (&args.end, &args.duration) {
        (Some(end), _) => end.clone(),
        (None, Some(duration)) => end_after(&args.start, duration)?,
        (None, None) => end_after(&args.start, "1h")?,
    };

    let mut form = EventForm::new(
        args.title.clone(),
        args.date.format("%Y-%m-%d").to_string(),
        args.start.clone(),
        end,
    );
    form.description = args.description.clone();
    form.location = args.location.clone();
    form.category = args.category.clone();
    form.notification_time = args.notify;
    form.repeat = match args.repeat {
        Some(kind) => RecurrenceRule::new(kind, args.interval, args.until),
        None => RecurrenceRule::none(),
    };

    Ok(form)
}

/// End time `duration` after `start`, which must stay on the same day.
fn end_after(start: &str, duration: &str) -> Result<String> {
    let start = NaiveTime::parse_from_str(start, "%H:%M")
        .with_context(|| format!("Invalid start time: \"{}\"", start))?;
    let std_dur = humantime::parse_duration(duration)
        .with_context(|| format!("Could not parse duration: \"{}\"", duration))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;

    let (end, overflow) = start.overflowing_add_signed(chrono_dur);
    if overflow != 0 {
        anyhow::bail!("Events must end on the day they start");
    }

    Ok(end.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        add: AddArgs,
    }

    fn parse(args: &[&str]) -> AddArgs {
        let mut argv = vec!["plancal", "회의"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().add
    }

    // --- end_after ---

    #[test]
    fn end_after_minutes_and_hours() {
        assert_eq!(end_after("14:00", "30m").unwrap(), "14:30");
        assert_eq!(end_after("14:00", "1h 30m").unwrap(), "15:30");
    }

    #[test]
    fn end_after_rejects_next_day() {
        assert!(end_after("23:30", "1h").is_err());
    }

    #[test]
    fn end_after_rejects_garbage() {
        assert!(end_after("14:00", "a while").is_err());
    }

    // --- build_form ---

    #[test]
    fn default_end_is_one_hour_later() {
        let form = build_form(&parse(&["-d", "2024-07-01", "-s", "9:00"])).unwrap();
        assert_eq!(form.date, "2024-07-01");
        assert_eq!(form.start_time, "09:00");
        assert_eq!(form.end_time, "10:00");
        assert!(form.repeat.kind.is_none());
        assert_eq!(form.notification_time, 10);
    }

    #[test]
    fn explicit_end_and_details() {
        let form = build_form(&parse(&[
            "-d", "2024-07-01", "-s", "14:00", "-e", "15:30", "-l", "회의실 B", "-c", "업무", "-n", "60",
        ]))
        .unwrap();
        assert_eq!(form.end_time, "15:30");
        assert_eq!(form.location, "회의실 B");
        assert_eq!(form.category, "업무");
        assert_eq!(form.notification_time, 60);
    }

    #[test]
    fn repeat_options_build_rule() {
        let form = build_form(&parse(&[
            "-d", "2024-01-31", "-s", "09:00", "-r", "monthly", "-i", "2", "-u", "2024-12-31",
        ]))
        .unwrap();
        assert_eq!(form.repeat.kind, RepeatType::Monthly);
        assert_eq!(form.repeat.interval, 2);
        assert_eq!(form.repeat.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert!(form.repeat.id.is_none());
    }

    #[test]
    fn until_without_repeat_is_rejected() {
        let argv = ["plancal", "회의", "-d", "2024-07-01", "-s", "09:00", "-u", "2024-12-31"];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn explicit_none_repeat_fails_validation() {
        let args = parse(&["-d", "2024-07-01", "-s", "09:00", "-r", "none"]);
        let form = build_form(&args).unwrap();
        assert!(validate_form(&form, args.repeat.is_some()).is_err());
    }
}
