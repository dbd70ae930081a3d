// Copyright (c) 2026 Bpass
// Licensed under the Apache License, Version 2.0

#![no_main]
#![forbid(unsafe_code)]

use bpass::core::allowlist::AllowlistTree;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = AllowlistTree::from_json(s);
    }
});
