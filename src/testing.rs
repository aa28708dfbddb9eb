use std::any::type_name;
use std::fmt::Debug;
use std::io;

use codeq::Codec;
use rand::Rng;

use crate::LogEntry;
use crate::LogValueType;

/// Assert `v` encodes to exactly `encoded_bytes` and decodes back.
///
/// Unlike `codeq::testing::test_codec`, damaged bytes are not expected to be
/// detected, since entries carry no checksum.
pub(crate) fn test_codec_without_corruption<D: Codec + PartialEq + Debug>(
    encoded_bytes: &[u8],
    v: &D,
) -> Result<(), io::Error> {
    let mes =
        format!("Type: {} encoded data: {:?}", type_name::<D>(), encoded_bytes);

    // Test encoding
    {
        let mut b = Vec::new();
        let n = v.encode(&mut b)?;
        assert_eq!(n, b.len(), "output len, {}", &mes);
        assert_eq!(b, encoded_bytes, "output data, {}", &mes);
    }

    // Test decoding
    {
        let b = encoded_bytes.to_vec();
        let decoded = D::decode(&mut b.as_slice())?;
        assert_eq!(v, &decoded, "decode, {}", &mes);
    }

    Ok(())
}

/// Build an entry with a random positive term, a random value type and a
/// value of 1 to 20 random bytes.
pub(crate) fn random_entry() -> LogEntry {
    let mut rng = rand::rng();

    let mut value = vec![0u8; rng.random_range(1..=20)];
    rng.fill(&mut value[..]);

    let value_type = LogValueType::try_from(rng.random_range(1..=4u8))
        .expect("1..=4 is a valid value type");

    LogEntry::new(rng.random_range(1..=i64::MAX), value_type, value)
}

/// Build an application entry.
pub(crate) fn app_entry(term: i64, value: &str) -> LogEntry {
    LogEntry::new(term, LogValueType::Application, value)
}
