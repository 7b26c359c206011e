use crate::engine::Engine;
use crate::enrich::ClickEnricher;
use pocketlink_core::{ClickOutcome, Clock, RecordRepository, StorageError};
use pocketlink_generator::Generator;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, error, info};

/// Pause shown before a redirect is resolved.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(500);

/// Period of the background expiry sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Waits `delay`, then records the click.
pub async fn follow_short_link<R, G, E, C>(
    engine: &Engine<R, G, E, C>,
    code: &str,
    user_agent: &str,
    delay: Duration,
) -> Result<ClickOutcome, StorageError>
where
    R: RecordRepository,
    G: Generator,
    E: ClickEnricher,
    C: Clock,
{
    debug!(component = "redirect", short_code = code, delay_ms = delay.as_millis() as u64, "resolving short link");
    sleep(delay).await;
    engine.track_click(code, user_agent)
}

/// Purges expired records every `period` until `shutdown` resolves.
///
/// The first sweep runs immediately. A failed sweep is logged and the loop
/// keeps going. Returns the total number of records removed.
pub async fn run_sweeper<R, G, E, C, F>(
    engine: &Engine<R, G, E, C>,
    period: Duration,
    shutdown: F,
) -> usize
where
    R: RecordRepository,
    G: Generator,
    E: ClickEnricher,
    C: Clock,
    F: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(component = "sweeper", period_secs = period.as_secs_f64(), "expiry sweeper started");
    let mut removed_total = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => match engine.purge_expired() {
                Ok(removed) => removed_total += removed,
                Err(e) => error!(component = "sweeper", error = %e, "expiry sweep failed"),
            },
        }
    }
    info!(component = "sweeper", removed_total, "expiry sweeper stopped");

    removed_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::FixedEnricher;
    use crate::settings::EngineSettings;
    use jiff::{SignedDuration, Timestamp};
    use pocketlink_core::{ManualClock, ShortCode, ShortenParams};
    use pocketlink_storage::{JsonRecordRepository, MemoryStore};
    use std::time::Instant;

    fn engine(
        clock: ManualClock,
    ) -> Engine<JsonRecordRepository<MemoryStore>, pocketlink_generator::RandomGenerator, FixedEnricher, ManualClock>
    {
        Engine::new(
            JsonRecordRepository::new(MemoryStore::new()),
            EngineSettings::default(),
        )
        .with_enricher(FixedEnricher::new("Referral", "Sydney, AU"))
        .with_clock(clock)
    }

    fn params(code: &str, minutes: i64) -> ShortenParams {
        ShortenParams::new("https://example.com")
            .with_validity(minutes)
            .with_alias(ShortCode::new(code).unwrap())
    }

    #[tokio::test]
    async fn follow_waits_then_tracks() {
        let clock = ManualClock::new(Timestamp::UNIX_EPOCH);
        let engine = engine(clock);
        engine.shorten(params("abc", 30)).unwrap();

        let started = Instant::now();
        let outcome = follow_short_link(&engine, "abc", "agent", Duration::from_millis(20))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(outcome.original_url(), Some("https://example.com"));
        assert_eq!(engine.lookup("abc").unwrap().record.click_count(), 1);
    }

    #[tokio::test]
    async fn follow_reports_unknown_code() {
        let engine = engine(ManualClock::default());

        let outcome = follow_short_link(&engine, "missing", "agent", Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(outcome, ClickOutcome::NotFound);
    }

    #[tokio::test]
    async fn sweeper_purges_until_shutdown() {
        let clock = ManualClock::new(Timestamp::UNIX_EPOCH);
        let engine = engine(clock.clone());
        engine.shorten(params("gone", 1)).unwrap();
        engine.shorten(params("kept", 60)).unwrap();
        clock.advance(SignedDuration::from_mins(5));

        let removed = run_sweeper(
            &engine,
            Duration::from_millis(10),
            sleep(Duration::from_millis(50)),
        )
        .await;

        assert_eq!(removed, 1);
        let remaining: Vec<String> = engine
            .list_all()
            .into_iter()
            .map(|v| v.record.short_code.to_string())
            .collect();
        assert_eq!(remaining, vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn sweeper_stops_immediately_on_ready_shutdown() {
        let engine = engine(ManualClock::default());
        let removed = run_sweeper(&engine, Duration::from_secs(3600), async {}).await;
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn events_are_tagged_with_their_component() {
        use pocketlink_telemetry::LogBuffer;
        use tracing_subscriber::layer::SubscriberExt;

        let logs = LogBuffer::new();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(logs.layer()));
        let engine = engine(ManualClock::default());

        follow_short_link(&engine, "missing", "agent", Duration::ZERO)
            .await
            .unwrap();
        run_sweeper(&engine, Duration::from_secs(3600), async {}).await;

        let components: Vec<String> = logs.entries().into_iter().map(|e| e.component).collect();
        assert!(components.iter().any(|c| c == "redirect"));
        assert!(components.iter().any(|c| c == "sweeper"));
        assert!(components.iter().any(|c| c == "engine"));
    }
}
