use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use plancal_core::recurrence::series_members;
use plancal_core::{Event, PlanCalError};

use crate::client::Client;

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Id of the event to delete
    pub id: String,

    /// Delete every event in the series
    #[arg(long)]
    pub series: bool,
}

pub async fn run(args: DeleteArgs, client: &Client) -> Result<()> {
    if !args.series {
        client.delete_event(&args.id).await?;
        println!("{}", "일정이 삭제되었습니다.".green());
        return Ok(());
    }

    let events = client.list_events().await?;
    let ids = series_ids(&events, &args.id)?;
    client.delete_events(&ids).await?;
    println!("{}", format!("일정 {}개가 삭제되었습니다.", ids.len()).green());

    Ok(())
}

/// Ids of every member of `id`'s series, or just `id` if it has none.
fn series_ids(events: &[Event], id: &str) -> Result<Vec<String>, PlanCalError> {
    let event = events
        .iter()
        .find(|event| event.id == id)
        .ok_or_else(|| PlanCalError::EventNotFound(id.to_string()))?;

    Ok(match event.series() {
        Some(group) => series_members(events, group)
            .into_iter()
            .map(|member| member.id)
            .collect(),
        None => vec![event.id.clone()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plancal_core::{EventForm, RecurrenceGroupId, RecurrenceRule, RepeatType};

    fn event(id: &str, group: Option<&str>) -> Event {
        let mut form = EventForm::new(id, "2024-07-01", "09:00", "10:00");
        if let Some(group) = group {
            form.repeat = RecurrenceRule::new(RepeatType::Daily, 1, None);
            form.repeat.id = Some(RecurrenceGroupId::new(group));
        }
        Event::new(id, form)
    }

    #[test]
    fn series_ids_collects_group() {
        let events = vec![event("1", Some("g")), event("2", None), event("3", Some("g"))];
        assert_eq!(series_ids(&events, "3").unwrap(), vec!["1", "3"]);
    }

    #[test]
    fn lone_event_deletes_itself() {
        let events = vec![event("1", Some("g")), event("2", None)];
        assert_eq!(series_ids(&events, "2").unwrap(), vec!["2"]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        assert!(matches!(
            series_ids(&[], "9"),
            Err(PlanCalError::EventNotFound(id)) if id == "9"
        ));
    }
}
