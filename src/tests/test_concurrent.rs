use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;

use crate::errors::LogStoreError;
use crate::testing::app_entry;
use crate::tests::context::new_testing;

/// Appends and reads from several threads are serialized: every appended
/// entry gets a distinct index and is readable right after.
#[test]
fn test_concurrent_append_and_read() -> Result<(), LogStoreError> {
    let (_ctx, store) = new_testing()?;
    let store = Arc::new(store);

    let n_threads = 4;
    let n_entries = 100;

    let mut handles = vec![];
    for t in 0..n_threads {
        let store = store.clone();

        let h = thread::spawn(move || -> Result<Vec<u64>, LogStoreError> {
            let mut indexes = vec![];
            for i in 0..n_entries {
                let entry = app_entry(t + 1, &format!("t{}-{}", t, i));
                let index = store.append(&entry)?;

                assert_eq!(Some(entry), store.get_log_entry_at(index)?);
                assert!(index < store.get_first_available_index()?);

                indexes.push(index);
            }
            Ok(indexes)
        });
        handles.push(h);
    }

    let mut all = vec![];
    for h in handles {
        let indexes = h.join().unwrap()?;

        // Indexes assigned to one thread grow
        assert!(indexes.windows(2).all(|w| w[0] < w[1]));
        all.extend(indexes);
    }

    all.sort();
    let want = (1..=(n_threads as u64 * n_entries)).collect::<Vec<_>>();
    assert_eq!(want, all);

    assert_eq!(
        n_threads as u64 * n_entries + 1,
        store.get_first_available_index()?
    );

    Ok(())
}

/// Readers never observe a half-applied pack.
#[test]
fn test_concurrent_apply_and_read() -> Result<(), LogStoreError> {
    let (_ctx, store) = new_testing()?;
    let store = Arc::new(store);

    for i in 0..10 {
        store.append(&app_entry(1, &format!("{}", i)))?;
    }

    let (_ctx2, source) = new_testing()?;
    for i in 0..10 {
        source.append(&app_entry(2, &format!("{}", i)))?;
    }
    let pack = source.pack_log(1, 10)?;

    let reader = {
        let store = store.clone();
        thread::spawn(move || -> Result<(), LogStoreError> {
            for _ in 0..200 {
                let entries = store.get_log_entries(1, 11)?;
                assert_eq!(10, entries.len());

                let term = entries[0].term();
                assert!(entries.iter().all(|e| e.term() == term));
            }
            Ok(())
        })
    };

    for _ in 0..20 {
        store.apply_log_pack(1, &pack)?;
    }

    reader.join().unwrap()?;

    assert_eq!(source.get_log_entries(1, 11)?, store.get_log_entries(1, 11)?);

    Ok(())
}
