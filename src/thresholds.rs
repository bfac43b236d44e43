//! Area-to-zoom recommendation table.
//!
//! Subject area here is `max_face_width * max_body_height`, both normalized,
//! so the table operates on [0, 1) but anything at or past `TOO_CLOSE_AREA`
//! means the subject should back up instead of being zoomed.

/// Subject area at or above this is treated as "too close"; no zoom is recommended.
pub const TOO_CLOSE_AREA: f32 = 0.09;

/// (range_low, range_high, recommended_zoom). Half-open ranges, contiguous,
/// non-overlapping over [0, TOO_CLOSE_AREA).
const TABLE: [(f32, f32, f32); 7] = [
    (0.0, 0.005, 3.0),
    (0.005, 0.01, 2.5),
    (0.01, 0.02, 2.0),
    (0.02, 0.03, 1.8),
    (0.03, 0.05, 1.5),
    (0.05, 0.07, 1.3),
    (0.07, 0.09, 1.1),
];

/// Look up the recommended zoom factor for a subject area.
///
/// Returns `None` for negative areas and for areas at or beyond the table
/// (>= 0.09), which the caller handles as "too close".
pub fn recommend_zoom(area: f32) -> Option<f32> {
    TABLE
        .iter()
        .find(|(low, high, _)| area >= *low && area < *high)
        .map(|(_, _, zoom)| *zoom)
}
