use std::sync::Arc;

use pretty_assertions::assert_eq;
use raft_seq_log::api::sequential_log_store::catch_up;
use raft_seq_log::Config;
use raft_seq_log::LogEntry;
use raft_seq_log::LogPack;
use raft_seq_log::LogStoreError;
use raft_seq_log::LogValueType;
use raft_seq_log::SeqLogStore;
use raft_seq_log::SequentialLogStore;
use tempfile::TempDir;

fn open_store(
    temp_dir: &TempDir,
    name: &str,
) -> Result<SeqLogStore, LogStoreError> {
    let dir = temp_dir.path().join(name);
    let config = Config::new(dir.to_str().unwrap());
    SeqLogStore::open(Arc::new(config))
}

fn entry(term: i64, value_type: LogValueType, value: &str) -> LogEntry {
    LogEntry::new(term, value_type, value)
}

/// A follower whose log diverged from the leader's is fast-forwarded with
/// packs, through the trait object interface.
#[test]
fn test_follower_catch_up() -> Result<(), LogStoreError> {
    let temp_dir = TempDir::new()?;

    let leader = open_store(&temp_dir, "leader")?;
    let follower = open_store(&temp_dir, "follower")?;

    for i in 1..=20 {
        let term = if i <= 10 { 1 } else { 2 };
        leader.append(&entry(term, LogValueType::Application, &i.to_string()))?;
    }
    leader.append(&entry(2, LogValueType::Configuration, "members: 1,2,3"))?;

    // The follower shares the first 10 entries, then diverges
    for i in 1..=10 {
        follower.append(&entry(1, LogValueType::Application, &i.to_string()))?;
    }
    for i in 11..=15 {
        follower.append(&entry(1, LogValueType::Application, "stale"))?;
        assert_eq!(i + 1, follower.get_first_available_index()?);
    }

    let leader: &dyn SequentialLogStore = &leader;
    let follower: &dyn SequentialLogStore = &follower;

    let first_available = catch_up(leader, follower, 11, 3)?;
    assert_eq!(22, first_available);

    assert_eq!(
        leader.get_log_entries(1, 22)?,
        follower.get_log_entries(1, 22)?
    );
    assert_eq!(
        entry(2, LogValueType::Configuration, "members: 1,2,3"),
        follower.get_last_log_entry()?
    );

    leader.close()?;
    follower.close()?;

    Ok(())
}

/// A pack holds the entries with their value types and empty values intact.
#[test]
fn test_pack_content() -> Result<(), LogStoreError> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir, "store")?;

    let entries = vec![
        entry(3, LogValueType::Application, "x"),
        entry(3, LogValueType::Configuration, "conf"),
        entry(4, LogValueType::ClusterServer, "srv"),
        entry(4, LogValueType::LogPack, ""),
    ];
    for e in entries.iter() {
        store.append(e)?;
    }

    let pack = LogPack::decode_exact(&store.pack_log(1, 10)?)?;
    assert_eq!(4, pack.len());
    assert_eq!(entries.as_slice(), pack.entries());
    assert_eq!(None, pack.entries()[3].value());

    // Re-applying a store's own pack changes nothing
    store.apply_log_pack(1, &store.pack_log(1, 10)?)?;
    assert_eq!(entries, store.get_log_entries(1, 5)?);

    Ok(())
}
