use crate::enrich::{ClickEnricher, RandomEnricher};
use crate::settings::EngineSettings;
use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;
use pocketlink_core::error::FormField;
use pocketlink_core::validation::{self, DURATION_MESSAGE, SHORTCODE_MESSAGE, URL_MESSAGE};
use pocketlink_core::{
    ClickEvent, ClickOutcome, Clock, FieldError, RecordRepository, ShortCode, ShortenParams,
    ShortenerError, StorageError, SystemClock, UrlRecord, UrlView, ValidationErrors,
};
use pocketlink_generator::{Generator, RandomGenerator};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const COMPONENT: &str = "engine";

/// Allocates short codes, records clicks and expires records.
///
/// Every operation reads the full collection from the repository, and every
/// mutation writes the full collection back. Mutations through one `Engine`
/// are serialized; two engines (or processes) sharing the same store are not
/// isolated from each other and the later save wins.
///
/// Expiry is never stored. It is recomputed from `expires_at` and the
/// engine's clock on every read.
pub struct Engine<R, G = RandomGenerator, E = RandomEnricher, C = SystemClock> {
    repository: R,
    generator: G,
    enricher: E,
    clock: C,
    settings: EngineSettings,
    write_lock: Mutex<()>,
}

impl<R: RecordRepository> Engine<R> {
    /// Creates an engine with random codes, random click enrichment and the
    /// system clock.
    pub fn new(repository: R, settings: EngineSettings) -> Self {
        Self {
            repository,
            generator: RandomGenerator::new(),
            enricher: RandomEnricher::new(),
            clock: SystemClock,
            settings,
            write_lock: Mutex::new(()),
        }
    }
}

impl<R, G, E, C> Engine<R, G, E, C> {
    pub fn with_generator<G2: Generator>(self, generator: G2) -> Engine<R, G2, E, C> {
        Engine {
            repository: self.repository,
            generator,
            enricher: self.enricher,
            clock: self.clock,
            settings: self.settings,
            write_lock: self.write_lock,
        }
    }

    pub fn with_enricher<E2: ClickEnricher>(self, enricher: E2) -> Engine<R, G, E2, C> {
        Engine {
            repository: self.repository,
            generator: self.generator,
            enricher,
            clock: self.clock,
            settings: self.settings,
            write_lock: self.write_lock,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> Engine<R, G, E, C2> {
        Engine {
            repository: self.repository,
            generator: self.generator,
            enricher: self.enricher,
            clock,
            settings: self.settings,
            write_lock: self.write_lock,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}

impl<R, G, E, C> Engine<R, G, E, C>
where
    R: RecordRepository,
    G: Generator,
    E: ClickEnricher,
    C: Clock,
{
    /// Creates and stores a new record.
    ///
    /// A custom alias is used verbatim and fails with
    /// [`ShortenerError::DuplicateShortcode`] if any stored record (expired
    /// or not) already has it. Otherwise codes are drawn from the generator
    /// until one is free and well formed, giving up after `max_attempts`
    /// unusable candidates or as soon as the generator runs dry.
    pub fn shorten(&self, params: ShortenParams) -> Result<UrlView, ShortenerError> {
        info!(
            component = COMPONENT,
            url = %params.original_url,
            validity_minutes = params.validity_minutes,
            custom_alias = ?params.custom_alias.as_ref().map(ShortCode::as_str),
            "shortening URL"
        );
        Self::check_params(&params)?;

        let _guard = self.write_lock.lock();
        let mut records = self.repository.load_all();

        let short_code = match params.custom_alias {
            Some(code) => {
                if records.iter().any(|r| r.short_code == code) {
                    warn!(component = COMPONENT, custom_alias = %code, "custom shortcode already exists");
                    return Err(ShortenerError::DuplicateShortcode(code.to_string()));
                }
                code
            }
            None => self.allocate(&records)?,
        };

        let now = self.clock.now();
        let expires_at = now
            .checked_add(SignedDuration::from_mins(params.validity_minutes))
            .map_err(|_| invalid(FormField::ValidityMinutes, DURATION_MESSAGE))?;

        let record = UrlRecord {
            id: Uuid::new_v4(),
            original_url: params.original_url,
            short_code,
            created_at: now,
            expires_at,
            clicks: Vec::new(),
        };
        records.push(record.clone());
        self.repository.save_all(&records)?;

        let view = self.view(record, now);
        info!(
            component = COMPONENT,
            short_code = %view.record.short_code,
            short_url = %view.short_url,
            "URL shortened successfully"
        );
        Ok(view)
    }

    /// Every stored record in insertion order, with expiry as of now.
    pub fn list_all(&self) -> Vec<UrlView> {
        let now = self.clock.now();
        let views: Vec<UrlView> = self
            .repository
            .load_all()
            .into_iter()
            .map(|record| self.view(record, now))
            .collect();
        debug!(component = COMPONENT, count = views.len(), "listed URLs");
        views
    }

    /// Finds the record whose code equals `code` exactly.
    pub fn lookup(&self, code: &str) -> Option<UrlView> {
        let now = self.clock.now();
        let found = self
            .repository
            .load_all()
            .into_iter()
            .find(|r| r.short_code.as_str() == code)
            .map(|record| self.view(record, now));
        debug!(component = COMPONENT, short_code = code, found = found.is_some(), "looked up URL");
        found
    }

    /// Records one click against `code` if it exists and has not expired.
    ///
    /// Unknown and expired codes are soft failures and leave the store
    /// untouched. Only a failed save is an error.
    pub fn track_click(&self, code: &str, user_agent: &str) -> Result<ClickOutcome, StorageError> {
        info!(component = COMPONENT, short_code = code, "tracking click");

        let _guard = self.write_lock.lock();
        let mut records = self.repository.load_all();

        let Some(record) = records.iter_mut().find(|r| r.short_code.as_str() == code) else {
            warn!(component = COMPONENT, short_code = code, "short URL not found");
            return Ok(ClickOutcome::NotFound);
        };

        let now = self.clock.now();
        if record.is_expired(now) {
            warn!(
                component = COMPONENT,
                short_code = code,
                expires_at = %record.expires_at,
                "short URL expired"
            );
            return Ok(ClickOutcome::Expired {
                expires_at: record.expires_at,
            });
        }

        let enrichment = self.enricher.enrich();
        record.clicks.push(ClickEvent {
            id: Uuid::new_v4(),
            timestamp: now,
            source: enrichment.source,
            location: enrichment.location,
            user_agent: user_agent.to_string(),
        });
        let original_url = record.original_url.clone();
        let click_count = record.clicks.len();

        self.repository.save_all(&records)?;

        info!(component = COMPONENT, short_code = code, click_count, "click tracked successfully");
        Ok(ClickOutcome::Redirect { original_url })
    }

    /// Deletes every record whose expiry time is not in the future and
    /// returns how many were removed. Nothing is written when none are.
    pub fn purge_expired(&self) -> Result<usize, StorageError> {
        let _guard = self.write_lock.lock();
        let records = self.repository.load_all();
        let now = self.clock.now();

        let total = records.len();
        let active: Vec<UrlRecord> = records.into_iter().filter(|r| r.expires_at > now).collect();
        let removed = total - active.len();

        if removed > 0 {
            self.repository.save_all(&active)?;
            info!(component = COMPONENT, removed, remaining = active.len(), "expired URLs cleaned up");
        } else {
            debug!(component = COMPONENT, "no expired URLs to clean up");
        }

        Ok(removed)
    }

    fn check_params(params: &ShortenParams) -> Result<(), ShortenerError> {
        let mut errors = Vec::new();
        if !validation::is_valid_url(&params.original_url) {
            errors.push(FieldError::new(FormField::OriginalUrl, URL_MESSAGE));
        }
        if !validation::is_valid_duration(params.validity_minutes) {
            errors.push(FieldError::new(FormField::ValidityMinutes, DURATION_MESSAGE));
        }
        if let Some(code) = &params.custom_alias {
            if !validation::is_valid_shortcode(code.as_str()) {
                errors.push(FieldError::new(FormField::CustomShortcode, SHORTCODE_MESSAGE));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            warn!(component = COMPONENT, errors = errors.len(), "rejected shorten parameters");
            Err(ShortenerError::Invalid(ValidationErrors::new(errors)))
        }
    }

    fn allocate(&self, records: &[UrlRecord]) -> Result<ShortCode, ShortenerError> {
        let taken: HashSet<&str> = records.iter().map(|r| r.short_code.as_str()).collect();

        for attempt in 1..=self.settings.max_attempts {
            let Some(candidate) = self.generator.generate() else {
                error!(component = COMPONENT, attempt, "shortcode generator is exhausted");
                return Err(ShortenerError::AllocationExhausted { attempts: attempt });
            };
            if !validation::is_valid_shortcode(candidate.as_str()) {
                warn!(component = COMPONENT, attempt, candidate = %candidate, "generated shortcode is malformed");
                continue;
            }
            if !taken.contains(candidate.as_str()) {
                return Ok(candidate);
            }
            debug!(component = COMPONENT, attempt, candidate = %candidate, "generated shortcode is taken");
        }

        error!(
            component = COMPONENT,
            attempts = self.settings.max_attempts,
            "failed to generate unique shortcode"
        );
        Err(ShortenerError::AllocationExhausted {
            attempts: self.settings.max_attempts,
        })
    }

    fn view(&self, record: UrlRecord, now: Timestamp) -> UrlView {
        UrlView::new(record, &self.settings.base_url, now)
    }
}

fn invalid(field: FormField, message: &str) -> ShortenerError {
    ShortenerError::Invalid(FieldError::new(field, message).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::FixedEnricher;
    use pocketlink_core::ManualClock;
    use pocketlink_generator::SeqGenerator;
    use pocketlink_storage::{JsonRecordRepository, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Repository that counts writes.
    struct CountingRepository {
        inner: JsonRecordRepository<MemoryStore>,
        saves: AtomicUsize,
        reject_writes: bool,
    }

    impl Default for CountingRepository {
        fn default() -> Self {
            Self {
                inner: JsonRecordRepository::new(MemoryStore::new()),
                saves: AtomicUsize::new(0),
                reject_writes: false,
            }
        }
    }

    impl CountingRepository {
        fn rejecting() -> Self {
            Self {
                reject_writes: true,
                ..Self::default()
            }
        }

        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl RecordRepository for CountingRepository {
        fn load_all(&self) -> Vec<UrlRecord> {
            self.inner.load_all()
        }

        fn save_all(&self, records: &[UrlRecord]) -> pocketlink_core::error::Result<()> {
            if self.reject_writes {
                return Err(StorageError::QuotaExceeded {
                    needed: 1,
                    quota: 0,
                });
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_all(records)
        }
    }

    /// Always proposes the same code.
    struct FixedGenerator(&'static str);

    impl Generator for FixedGenerator {
        fn generate(&self) -> Option<ShortCode> {
            Some(ShortCode::new_unchecked(self.0))
        }
    }

    type TestEngine<G = SeqGenerator> =
        Engine<Arc<CountingRepository>, G, FixedEnricher, ManualClock>;

    fn start() -> Timestamp {
        "2024-05-01T10:00:00Z".parse().unwrap()
    }

    fn engine_with<G: Generator>(
        repo: Arc<CountingRepository>,
        generator: G,
        clock: ManualClock,
    ) -> TestEngine<G> {
        Engine::new(repo, EngineSettings::default())
            .with_generator(generator)
            .with_enricher(FixedEnricher::new("Direct", "Tokyo, JP"))
            .with_clock(clock)
    }

    fn test_engine() -> (TestEngine, Arc<CountingRepository>, ManualClock) {
        let repo = Arc::new(CountingRepository::default());
        let clock = ManualClock::new(start());
        let engine = engine_with(
            Arc::clone(&repo),
            SeqGenerator::with_prefix("pl").unwrap(),
            clock.clone(),
        );
        (engine, repo, clock)
    }

    fn alias(code: &str) -> ShortCode {
        ShortCode::new(code).unwrap()
    }

    #[test]
    fn shorten_with_generated_code() {
        let (engine, repo, _) = test_engine();

        let view = engine
            .shorten(ShortenParams::new("https://example.com"))
            .unwrap();

        assert_eq!(view.record.short_code.as_str(), "pl000000");
        assert_eq!(view.short_url, "http://localhost:3000/r/pl000000");
        assert_eq!(view.record.original_url, "https://example.com");
        assert_eq!(view.record.created_at, start());
        assert_eq!(
            view.record.expires_at,
            start() + SignedDuration::from_mins(30)
        );
        assert!(view.record.clicks.is_empty());
        assert!(!view.is_expired);
        assert_eq!(repo.saves(), 1);
    }

    #[test]
    fn shorten_with_custom_alias() {
        let (engine, _, _) = test_engine();

        let view = engine
            .shorten(ShortenParams::new("https://example.com").with_alias(alias("abc")))
            .unwrap();

        assert_eq!(view.record.short_code.as_str(), "abc");
    }

    #[test]
    fn shorten_with_duplicate_alias_fails() {
        let (engine, repo, _) = test_engine();

        engine
            .shorten(ShortenParams::new("https://example1.com").with_alias(alias("abc")))
            .unwrap();
        let err = engine
            .shorten(ShortenParams::new("https://example2.com").with_alias(alias("abc")))
            .unwrap_err();

        assert!(matches!(err, ShortenerError::DuplicateShortcode(ref c) if c == "abc"));
        assert_eq!(repo.saves(), 1);
        assert_eq!(engine.list_all().len(), 1);
    }

    #[test]
    fn expired_record_still_blocks_its_alias() {
        let (engine, _, clock) = test_engine();

        engine
            .shorten(
                ShortenParams::new("https://example.com")
                    .with_validity(1)
                    .with_alias(alias("abc")),
            )
            .unwrap();
        clock.advance(SignedDuration::from_mins(5));

        let err = engine
            .shorten(ShortenParams::new("https://example.com").with_alias(alias("abc")))
            .unwrap_err();
        assert!(matches!(err, ShortenerError::DuplicateShortcode(_)));
    }

    #[test]
    fn alias_comparison_is_case_sensitive() {
        let (engine, _, _) = test_engine();

        engine
            .shorten(ShortenParams::new("https://example.com").with_alias(alias("abc")))
            .unwrap();

        assert!(engine
            .shorten(ShortenParams::new("https://example.com").with_alias(alias("ABC")))
            .is_ok());
        assert!(engine.lookup("Abc").is_none());
    }

    #[test]
    fn generated_codes_skip_taken_ones() {
        let (engine, _, _) = test_engine();

        engine
            .shorten(ShortenParams::new("https://a.com").with_alias(alias("pl000000")))
            .unwrap();
        let view = engine.shorten(ShortenParams::new("https://b.com")).unwrap();

        assert_eq!(view.record.short_code.as_str(), "pl000001");
    }

    #[test]
    fn allocation_gives_up_after_max_attempts() {
        let repo = Arc::new(CountingRepository::default());
        let engine = engine_with(
            Arc::clone(&repo),
            FixedGenerator("same00"),
            ManualClock::new(start()),
        );

        engine.shorten(ShortenParams::new("https://a.com")).unwrap();
        let err = engine
            .shorten(ShortenParams::new("https://b.com"))
            .unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::AllocationExhausted { attempts: 100 }
        ));
        assert_eq!(repo.saves(), 1);
    }

    #[test]
    fn malformed_candidates_count_as_failed_attempts() {
        let repo = Arc::new(CountingRepository::default());
        let engine = engine_with(
            Arc::clone(&repo),
            FixedGenerator("bad-code"),
            ManualClock::new(start()),
        );

        let err = engine
            .shorten(ShortenParams::new("https://a.com"))
            .unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::AllocationExhausted { attempts: 100 }
        ));
        assert_eq!(repo.saves(), 0);
    }

    #[test]
    fn long_prefix_generator_never_yields_oversized_codes() {
        let repo = Arc::new(CountingRepository::default());
        let engine = engine_with(
            Arc::clone(&repo),
            SeqGenerator::with_offset("abcdefghijklmn", 999_999).unwrap(),
            ManualClock::new(start()),
        );

        let first = engine.shorten(ShortenParams::new("https://a.com")).unwrap();
        assert_eq!(first.record.short_code.as_str(), "abcdefghijklmn999999");
        assert!(validation::is_valid_shortcode(first.record.short_code.as_str()));

        let err = engine
            .shorten(ShortenParams::new("https://b.com"))
            .unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::AllocationExhausted { attempts: 1 }
        ));
        assert!(engine
            .list_all()
            .iter()
            .all(|v| validation::is_valid_shortcode(v.record.short_code.as_str())));
        assert_eq!(repo.saves(), 1);
    }

    #[test]
    fn generated_codes_are_unique_and_well_formed() {
        let repo = Arc::new(CountingRepository::default());
        let engine = engine_with(
            Arc::clone(&repo),
            pocketlink_generator::RandomGenerator::seeded(1),
            ManualClock::new(start()),
        );

        let mut seen = HashSet::new();
        for i in 0..50 {
            let view = engine
                .shorten(ShortenParams::new(format!("https://example.com/{i}")))
                .unwrap();
            let code = view.record.short_code.to_string();
            assert!(validation::is_valid_shortcode(&code));
            assert!(seen.insert(code));
        }
    }

    #[test]
    fn shorten_rejects_invalid_params() {
        let (engine, repo, _) = test_engine();

        let err = engine
            .shorten(ShortenParams::new("ftp://example.com").with_validity(0))
            .unwrap_err();

        let ShortenerError::Invalid(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.for_field(FormField::OriginalUrl).is_some());
        assert!(errors.for_field(FormField::ValidityMinutes).is_some());
        assert_eq!(repo.saves(), 0);
    }

    #[test]
    fn shorten_rejects_unchecked_malformed_alias() {
        let (engine, _, _) = test_engine();

        let err = engine
            .shorten(
                ShortenParams::new("https://example.com")
                    .with_alias(ShortCode::new_unchecked("ab")),
            )
            .unwrap_err();

        assert!(matches!(err, ShortenerError::Invalid(_)));
    }

    #[test]
    fn shorten_surfaces_write_failure() {
        let repo = Arc::new(CountingRepository::rejecting());
        let engine = engine_with(
            repo,
            SeqGenerator::with_prefix("pl").unwrap(),
            ManualClock::new(start()),
        );

        let err = engine
            .shorten(ShortenParams::new("https://example.com"))
            .unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn list_all_keeps_insertion_order_and_recomputes_expiry() {
        let (engine, repo, clock) = test_engine();

        engine
            .shorten(ShortenParams::new("https://short.com").with_validity(5))
            .unwrap();
        engine
            .shorten(ShortenParams::new("https://long.com").with_validity(60))
            .unwrap();
        clock.advance(SignedDuration::from_mins(10));

        let views = engine.list_all();
        let summary: Vec<(&str, bool)> = views
            .iter()
            .map(|v| (v.record.original_url.as_str(), v.is_expired))
            .collect();

        assert_eq!(
            summary,
            vec![("https://short.com", true), ("https://long.com", false)]
        );
        assert_eq!(repo.saves(), 2);
    }

    #[test]
    fn expiry_flips_exactly_after_expires_at() {
        let (engine, _, clock) = test_engine();
        engine
            .shorten(ShortenParams::new("https://example.com").with_alias(alias("abc")))
            .unwrap();

        clock.advance(SignedDuration::from_mins(30));
        assert!(!engine.lookup("abc").unwrap().is_expired);

        clock.advance(SignedDuration::from_millis(1));
        assert!(engine.lookup("abc").unwrap().is_expired);
    }

    #[test]
    fn lookup_missing_code() {
        let (engine, _, _) = test_engine();
        assert!(engine.lookup("nothere").is_none());
    }

    #[test]
    fn track_click_unknown_code_does_not_write() {
        let (engine, repo, _) = test_engine();
        engine
            .shorten(ShortenParams::new("https://example.com"))
            .unwrap();

        let outcome = engine.track_click("missing", "agent").unwrap();

        assert_eq!(outcome, ClickOutcome::NotFound);
        assert_eq!(outcome.failure_reason(), Some("Short URL not found"));
        assert_eq!(repo.saves(), 1);
    }

    #[test]
    fn track_click_expired_code_appends_nothing() {
        let (engine, repo, clock) = test_engine();
        engine
            .shorten(ShortenParams::new("https://example.com").with_alias(alias("abc")))
            .unwrap();
        clock.advance(SignedDuration::from_mins(31));

        let outcome = engine.track_click("abc", "agent").unwrap();

        assert_eq!(
            outcome,
            ClickOutcome::Expired {
                expires_at: start() + SignedDuration::from_mins(30)
            }
        );
        assert!(engine.lookup("abc").unwrap().record.clicks.is_empty());
        assert_eq!(repo.saves(), 1);
    }

    #[test]
    fn track_click_appends_events_in_call_order() {
        let (engine, repo, clock) = test_engine();
        engine
            .shorten(ShortenParams::new("https://example.com").with_alias(alias("abc")))
            .unwrap();

        for i in 0..3 {
            clock.advance(SignedDuration::from_secs(10));
            let outcome = engine.track_click("abc", &format!("agent-{i}")).unwrap();
            assert_eq!(outcome.original_url(), Some("https://example.com"));
        }

        let clicks = engine.lookup("abc").unwrap().record.clicks;
        let agents: Vec<&str> = clicks.iter().map(|c| c.user_agent.as_str()).collect();
        assert_eq!(agents, vec!["agent-0", "agent-1", "agent-2"]);
        assert!(clicks.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(clicks[0].source, "Direct");
        assert_eq!(clicks[0].location, "Tokyo, JP");
        assert_eq!(clicks[0].timestamp, start() + SignedDuration::from_secs(10));
        assert_eq!(repo.saves(), 4);
    }

    #[test]
    fn track_click_only_touches_the_matching_record() {
        let (engine, _, _) = test_engine();
        engine
            .shorten(ShortenParams::new("https://a.com").with_alias(alias("aaa")))
            .unwrap();
        engine
            .shorten(ShortenParams::new("https://b.com").with_alias(alias("bbb")))
            .unwrap();

        engine.track_click("bbb", "agent").unwrap();

        assert_eq!(engine.lookup("aaa").unwrap().record.click_count(), 0);
        assert_eq!(engine.lookup("bbb").unwrap().record.click_count(), 1);
    }

    #[test]
    fn track_click_surfaces_write_failure() {
        let repo = Arc::new(CountingRepository::rejecting());
        let engine = engine_with(
            Arc::clone(&repo),
            SeqGenerator::with_prefix("pl").unwrap(),
            ManualClock::new(start()),
        );
        let created_at = start();
        repo.inner
            .save_all(&[UrlRecord {
                id: Uuid::new_v4(),
                original_url: "https://example.com".to_string(),
                short_code: alias("abc"),
                created_at,
                expires_at: created_at + SignedDuration::from_mins(30),
                clicks: Vec::new(),
            }])
            .unwrap();

        let err = engine.track_click("abc", "agent").unwrap_err();

        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(engine.lookup("abc").unwrap().record.click_count(), 0);
    }

    #[test]
    fn purge_removes_only_expired_records() {
        let (engine, repo, clock) = test_engine();
        engine
            .shorten(
                ShortenParams::new("https://short.com")
                    .with_validity(5)
                    .with_alias(alias("short")),
            )
            .unwrap();
        engine
            .shorten(
                ShortenParams::new("https://long.com")
                    .with_validity(120)
                    .with_alias(alias("long")),
            )
            .unwrap();
        engine.track_click("long", "agent").unwrap();
        clock.advance(SignedDuration::from_mins(10));

        assert_eq!(engine.purge_expired().unwrap(), 1);
        assert_eq!(repo.saves(), 4);

        let remaining = engine.list_all();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].record.short_code.as_str(), "long");
        assert_eq!(remaining[0].record.click_count(), 1);

        assert_eq!(engine.purge_expired().unwrap(), 0);
        assert_eq!(repo.saves(), 4);
    }

    #[test]
    fn purge_frees_the_alias() {
        let (engine, _, clock) = test_engine();
        engine
            .shorten(
                ShortenParams::new("https://old.com")
                    .with_validity(1)
                    .with_alias(alias("abc")),
            )
            .unwrap();
        clock.advance(SignedDuration::from_mins(2));
        engine.purge_expired().unwrap();

        let view = engine
            .shorten(ShortenParams::new("https://new.com").with_alias(alias("abc")))
            .unwrap();
        assert_eq!(view.record.original_url, "https://new.com");
    }

    #[test]
    fn purge_on_empty_store_writes_nothing() {
        let (engine, repo, _) = test_engine();
        assert_eq!(engine.purge_expired().unwrap(), 0);
        assert_eq!(repo.saves(), 0);
    }

    #[test]
    fn concurrent_clicks_through_one_engine_are_not_lost() {
        let (engine, _, _) = test_engine();
        engine
            .shorten(ShortenParams::new("https://example.com").with_alias(alias("abc")))
            .unwrap();
        let engine = Arc::new(engine);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        engine.track_click("abc", &format!("thread-{i}")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.lookup("abc").unwrap().record.click_count(), 40);
    }
}
