//! Time-of-day segmentation.
//!
//! Maps a local timestamp to one of the four fixed day windows:
//! morning 6am-12pm, afternoon 12pm-4pm, evening 4pm-10pm, night 10pm-6am.
//! Pure function of the hour component — callers supply an
//! already-localized timestamp; no timezone conversion happens here.

use chrono::{NaiveDateTime, Timelike};

use crate::models::Segment;

/// Classify a local timestamp into its day segment.
pub fn classify(timestamp: NaiveDateTime) -> Segment {
    segment_for_hour(timestamp.hour())
}

/// Segment for an hour in [0, 24). Total — every hour maps to exactly
/// one segment.
pub fn segment_for_hour(hour: u32) -> Segment {
    match hour {
        6..=11 => Segment::Morning,
        12..=15 => Segment::Afternoon,
        16..=21 => Segment::Evening,
        _ => Segment::Night,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_hour(hour: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn every_hour_maps_to_exactly_one_segment() {
        let mut counts = [0usize; 4];
        for hour in 0..24 {
            let seg = segment_for_hour(hour);
            let idx = Segment::ALL.iter().position(|s| *s == seg).unwrap();
            counts[idx] += 1;
        }
        // 6 morning + 4 afternoon + 6 evening + 8 night = 24, no gap/overlap
        assert_eq!(counts, [6, 4, 6, 8]);
    }

    #[test]
    fn segment_boundaries() {
        assert_eq!(segment_for_hour(5), Segment::Night);
        assert_eq!(segment_for_hour(6), Segment::Morning);
        assert_eq!(segment_for_hour(11), Segment::Morning);
        assert_eq!(segment_for_hour(12), Segment::Afternoon);
        assert_eq!(segment_for_hour(15), Segment::Afternoon);
        assert_eq!(segment_for_hour(16), Segment::Evening);
        assert_eq!(segment_for_hour(21), Segment::Evening);
        assert_eq!(segment_for_hour(22), Segment::Night);
        assert_eq!(segment_for_hour(23), Segment::Night);
        assert_eq!(segment_for_hour(0), Segment::Night);
    }

    #[test]
    fn classify_uses_hour_component_only() {
        assert_eq!(classify(at_hour(8)), Segment::Morning);
        assert_eq!(classify(at_hour(13)), Segment::Afternoon);
        assert_eq!(classify(at_hour(19)), Segment::Evening);
        assert_eq!(classify(at_hour(2)), Segment::Night);
    }
}
