//! Term fixtures and manager helpers.
//!
//! The fixture thesaurus has a preferred term `Foo` with a broader term,
//! a non-preferred `Fu` that points at `Foo`, and an ambiguous `Bat` that
//! points at both `Bat (animal)` and `Bat (club)`.

use crate::service::{TermService, API_KEY, API_URL};
use folksaurus_client::{
    ClientConfig, HttpTransport, LocalStore, SummaryRecord, TermId, TermManager, TermRecord,
};
use std::sync::Arc;
use std::time::Duration;

/// Expire time used by [`manager_for`].
pub const TEST_EXPIRE_TIME: Duration = Duration::from_secs(60 * 60);

/// One day in seconds.
pub const DAY: i64 = 24 * 60 * 60;

/// A manager talking HTTP to an in-memory service.
pub type ServiceManager<S> = TermManager<HttpTransport<Arc<TermService>>, S>;

/// Returns the configuration used by [`manager_for`].
pub fn test_config() -> ClientConfig {
    ClientConfig::new(API_KEY, API_URL).with_expire_time(TEST_EXPIRE_TIME)
}

/// Builds a manager over `service` and `store`.
pub fn manager_for<S: LocalStore>(service: &Arc<TermService>, store: Arc<S>) -> ServiceManager<S> {
    let config = test_config();
    let transport = HttpTransport::from_config(&config, Arc::clone(service));
    TermManager::new(config, Arc::new(transport), store)
}

/// `Foo`, a preferred term with id 1.
pub fn foo_record() -> TermRecord {
    TermRecord {
        id: Some(TermId::from(1u64)),
        scope_note: "A term used in examples.".into(),
        broader: vec![SummaryRecord::new(2u64, "Super Foo")],
        used_for: vec![SummaryRecord::new(3u64, "Fu")],
        ..TermRecord::named("Foo")
    }
}

/// `Super Foo`, broader than `Foo`.
pub fn super_foo_record() -> TermRecord {
    TermRecord {
        id: Some(TermId::from(2u64)),
        narrower: vec![SummaryRecord::new(1u64, "Foo")],
        ..TermRecord::named("Super Foo")
    }
}

/// `Fu`, a non-preferred term pointing at `Foo`.
pub fn fu_record() -> TermRecord {
    TermRecord {
        id: Some(TermId::from(3u64)),
        use_terms: vec![SummaryRecord::new(1u64, "Foo")],
        ..TermRecord::named("Fu")
    }
}

/// `Bat`, an ambiguous term.
pub fn bat_record() -> TermRecord {
    TermRecord {
        id: Some(TermId::from(4u64)),
        use_terms: vec![
            SummaryRecord::new(5u64, "Bat (animal)"),
            SummaryRecord::new(6u64, "Bat (club)"),
        ],
        ..TermRecord::named("Bat")
    }
}

/// The two targets of `Bat`.
pub fn bat_target_records() -> [TermRecord; 2] {
    [
        TermRecord {
            id: Some(TermId::from(5u64)),
            used_for: vec![SummaryRecord::new(4u64, "Bat")],
            ..TermRecord::named("Bat (animal)")
        },
        TermRecord {
            id: Some(TermId::from(6u64)),
            used_for: vec![SummaryRecord::new(4u64, "Bat")],
            ..TermRecord::named("Bat (club)")
        },
    ]
}

/// Loads the whole fixture thesaurus into `service`.
pub fn seed_thesaurus(service: &TermService) {
    let [animal, club] = bat_target_records();
    for record in [
        foo_record(),
        super_foo_record(),
        fu_record(),
        bat_record(),
        animal,
        club,
    ] {
        service.insert(record);
    }
}

/// Returns `record` as a cached copy with the given app id and retrieval time.
pub fn cached(record: TermRecord, app_id: u64, last_retrieved: i64) -> TermRecord {
    TermRecord {
        app_id: Some(app_id.into()),
        last_retrieved,
        ..record
    }
}
