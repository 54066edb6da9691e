//! Property-based test generators using proptest.

use playdock_protocol::SavePayload;
use proptest::prelude::*;

/// Strategy for valid save names: ASCII, 1 to 60 bytes.
pub fn save_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _-]{1,60}").expect("invalid regex")
}

/// Strategy for valid summaries: 1 to 500 bytes.
pub fn summary_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 .,!?]{1,500}").expect("invalid regex")
}

/// Strategy for save data up to 4 KiB. Real limits are megabytes;
/// property tests stay small to keep shrinking fast.
pub fn save_data_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..4096)
}

/// Strategy for caller-chosen request ids across the whole i64 range.
pub fn request_id_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Strategy for complete, limit-respecting save payloads.
pub fn save_payload_strategy() -> impl Strategy<Value = SavePayload> {
    (
        save_name_strategy(),
        summary_strategy(),
        prop::option::of(prop::string::string_regex("[a-z0-9]{0,100}").expect("invalid regex")),
        any::<u32>(),
        save_data_strategy(),
        prop::option::of(prop::collection::vec(any::<u8>(), 1..1024)),
    )
        .prop_map(|(name, summary, extra, playtime, data, cover)| SavePayload {
            name,
            summary,
            extra,
            playtime,
            data,
            cover,
        })
}
