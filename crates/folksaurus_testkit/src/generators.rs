//! Proptest generators for terms.

use folksaurus_client::{SummaryRecord, TermId, TermRecord};
use proptest::prelude::*;

/// Generates term names: words separated by single spaces, possibly with
/// characters that need escaping in a URL path.
pub fn arb_term_name() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z0-9&/?#%é]{1,8}", 1..4).prop_map(|words| words.join(" "))
}

/// Generates term summaries with small numeric ids.
pub fn arb_summary() -> impl Strategy<Value = SummaryRecord> {
    (1u64..10_000, arb_term_name()).prop_map(|(id, name)| SummaryRecord::new(id, name))
}

fn arb_summaries() -> impl Strategy<Value = Vec<SummaryRecord>> {
    prop::collection::vec(arb_summary(), 0..3)
}

/// Generates service-side term records.
pub fn arb_term_record() -> impl Strategy<Value = TermRecord> {
    (
        1u64..10_000,
        arb_term_name(),
        "[ -~]{0,40}",
        arb_summaries(),
        arb_summaries(),
        arb_summaries(),
        arb_summaries(),
        arb_summaries(),
    )
        .prop_map(
            |(id, name, scope_note, broader, narrower, related, used_for, use_terms)| TermRecord {
                id: Some(TermId::from(id)),
                app_id: None,
                name,
                scope_note,
                last_retrieved: 0,
                broader,
                narrower,
                related,
                used_for,
                use_terms,
            },
        )
}
