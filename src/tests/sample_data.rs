//! Provide sample data for testing
//!
//! The sample log is the one used throughout the tests:
//! terms `[5, 5, 6]` with values `["a", "bb", "ccc"]`.

use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::errors::LogStoreError;
use crate::testing::app_entry;
use crate::LogEntry;
use crate::SeqLogStore;

pub(crate) fn sample_entries() -> Vec<LogEntry> {
    vec![app_entry(5, "a"), app_entry(5, "bb"), app_entry(6, "ccc")]
}

pub(crate) fn build_sample_data(
    store: &SeqLogStore,
) -> Result<String, LogStoreError> {
    assert_eq!(1, store.get_first_available_index()?);

    for (i, entry) in sample_entries().iter().enumerate() {
        let index = store.append(entry)?;
        assert_eq!(i as u64 + 1, index);
    }

    let dumped = indoc! {r#"
        SeqLogStore:
          I-00001: [000_000_000, 000_000_014) Size(14): LogEntry{term: 5, type: Application, value: 0x61}
          I-00002: [000_000_014, 000_000_029) Size(15): LogEntry{term: 5, type: Application, value: 0x6262}
          I-00003: [000_000_029, 000_000_045) Size(16): LogEntry{term: 6, type: Application, value: 0x636363}
        "#};

    let dump = store.dump().write_to_string()?;
    println!("Sample data:\n{}", dump);

    assert_eq!(dumped, dump);

    Ok(dumped.to_string())
}
