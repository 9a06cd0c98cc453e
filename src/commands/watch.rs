use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use plancal_core::{PlanCalConfig, Poller, SystemClock};

use crate::client::Client;
use crate::render::Render;

/// Print notifications as events approach until Ctrl-C.
pub async fn run(client: Client, config: &PlanCalConfig) -> Result<()> {
    let (tx, rx) = watch::channel(client.list_events().await?);

    let refresh = config.refresh_interval();
    let refresher = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately and the snapshot is already fresh.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match client.list_events().await {
                Ok(events) => {
                    if tx.send(events).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "could not refresh events"),
            }
        }
    });

    println!("{}", "알림 대기 중... (Ctrl-C로 종료)".dimmed());

    let poller = Poller::new(SystemClock, config.poll_interval());
    let center = poller
        .run(
            rx,
            async {
                let _ = tokio::signal::ctrl_c().await;
            },
            |notification| println!("{}", notification.render()),
        )
        .await;

    refresher.abort();
    println!();
    println!(
        "{}",
        format!("알림 {}건", center.notified_count()).dimmed()
    );

    Ok(())
}
