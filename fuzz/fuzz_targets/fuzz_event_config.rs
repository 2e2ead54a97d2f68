#![no_main]

use libfuzzer_sys::fuzz_target;
use trackledger::config::{EventConfig, RunConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must either succeed or fail with an error, never panic
    if let Ok(event) = EventConfig::parse(text) {
        assert!(event.energy >= 0.0 && event.energy.is_finite());
        assert!((0.0..=1.0).contains(&event.aoi));
        assert!(event.n > 0);
        // Display must not panic either
        let _ = event.to_string();
    }

    if let Ok(config) = text.parse::<RunConfig>() {
        let _ = config.recorder_config();
        let _ = config.event_config();
    }
});
