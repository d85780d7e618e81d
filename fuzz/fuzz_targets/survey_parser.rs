#![no_main]

use abreport::survey::SurveyDataset;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed CSV must surface as an error, never a panic
        let _ = SurveyDataset::from_csv_str(input);
    }
});
