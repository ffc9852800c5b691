#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing and every extractor must fail gracefully, never panic
    if let Ok(document) = czimeta::OmeXml::parse(xml) {
        let _ = document.channels(true);
        let _ = document.pixel_size(false);
        let _ = document.plane_table(czimeta::planes::utc());
        let _ = document.image_size_summary();

        if let Ok(annotations) = document.structured_annotation_dict() {
            let _ = annotations.binning();
            let _ = annotations.camera_roi(czimeta::annotations::IMAGE_FRAME_KEY);
            let _ = annotations.camera_lut();
            let _ = annotations.camera_bits();
        }
    }
});
