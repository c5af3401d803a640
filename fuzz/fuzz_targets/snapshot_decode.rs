//! Snapshot decoding must never panic, whatever arrives on the wire.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sundial_proto::WeatherSnapshot;

fuzz_target!(|data: &[u8]| {
    // Either a valid snapshot or a DecodeError; never a crash.
    let _ = WeatherSnapshot::decode(data);
});
