//! Property tests for timing derivation, windows and pixel formats

use ltdc::{Color, PixelFormat, TimingConfig};
use proptest::prelude::*;

fn valid_timing() -> impl Strategy<Value = TimingConfig> {
    (
        (1u16..=800, 1u16..=600),
        (1u16..=1000, 1u16..=400),
        (0u16..=1000, 0u16..=400),
        (0u16..=1000, 0u16..=400),
    )
        .prop_map(|((w, h), (hs, vs), (hbp, vbp), (hfp, vfp))| {
            TimingConfig::new(w, h)
                .with_sync(hs, vs)
                .with_back_porch(hbp, vbp)
                .with_front_porch(hfp, vfp)
        })
}

/// Bits of a packed pixel the format actually stores
const fn stored_bits(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Argb8888 => 0xFFFF_FFFF,
        PixelFormat::Rgb888 => 0x00FF_FFFF,
        PixelFormat::Rgb565
        | PixelFormat::Argb1555
        | PixelFormat::Argb4444
        | PixelFormat::Al88 => 0xFFFF,
        PixelFormat::L8 | PixelFormat::Al44 => 0xFF,
    }
}

proptest! {
    #[test]
    fn accumulated_windows_increase(timing in valid_timing()) {
        let windows = timing.compute().unwrap();
        let stages = [
            (windows.sync, 0, 0),
            (windows.back_porch, timing.h_back_porch, timing.v_back_porch),
            (windows.active, timing.screen_width, timing.screen_height),
            (windows.total, timing.h_front_porch, timing.v_front_porch),
        ];
        for pair in stages.windows(2) {
            let (prev, _, _) = pair[0];
            let (next, added_h, added_v) = pair[1];
            prop_assert!(next.width >= prev.width);
            prop_assert!(next.height >= prev.height);
            prop_assert_eq!(next.width > prev.width, added_h > 0);
            prop_assert_eq!(next.height > prev.height, added_v > 0);
        }
        prop_assert!(windows.sync.width < windows.active.width);
        prop_assert!(windows.sync.height < windows.active.height);
    }

    #[test]
    fn active_window_inside_total(timing in valid_timing()) {
        let windows = timing.compute().unwrap();
        let active = windows.active_window;
        prop_assert!(active.hstart <= active.hstop);
        prop_assert!(active.vstart <= active.vstop);
        prop_assert!(active.hstop <= windows.total.width);
        prop_assert!(active.vstop <= windows.total.height);
        prop_assert_eq!(active.width(), timing.screen_width);
        prop_assert_eq!(active.height(), timing.screen_height);
    }

    #[test]
    fn oversized_screen_rejected(width in 801u16..=4096, height in 1u16..=600) {
        prop_assert!(TimingConfig::new(width, height).compute().is_err());
    }

    #[test]
    fn canonical_round_trip_keeps_stored_bits(index in 0usize..8, raw in any::<u32>()) {
        let format = PixelFormat::ALL[index];
        let stored = raw & stored_bits(format);
        let canonical = format.to_canonical(raw);
        prop_assert_eq!(format.from_canonical(canonical), stored);
    }

    #[test]
    fn narrowing_is_idempotent(index in 0usize..8, argb in any::<u32>()) {
        let format = PixelFormat::ALL[index];
        let packed = format.from_canonical(Color(argb));
        prop_assert_eq!(format.from_canonical(format.to_canonical(packed)), packed);
    }
}
