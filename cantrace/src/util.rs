//! Small helpers for diagnostics output

/// Wording used to print a `bool`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoolStyle {
    /// `true` / `false`
    TrueFalse,
    /// `ok` / `error`
    OkError,
    /// `high` / `low`
    Level,
    /// `1` / `0`
    Number,
    /// `on` / `off`
    Status,
    /// `yes` / `no`
    Decision,
}

impl BoolStyle {
    /// Text for `value` in this style
    pub const fn as_str(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::TrueFalse, true) => "true",
            (Self::TrueFalse, false) => "false",
            (Self::OkError, true) => "ok",
            (Self::OkError, false) => "error",
            (Self::Level, true) => "high",
            (Self::Level, false) => "low",
            (Self::Number, true) => "1",
            (Self::Number, false) => "0",
            (Self::Status, true) => "on",
            (Self::Status, false) => "off",
            (Self::Decision, true) => "yes",
            (Self::Decision, false) => "no",
        }
    }
}

/// Position of `value` within `min..=max` in percent.
///
/// `value` outside the range trips a `debug_assert!`; in release builds the
/// result simply lies outside `0.0..=100.0`. An empty range (`min == max`)
/// gives a non-finite result.
pub fn percent_f32(value: f32, min: f32, max: f32) -> f32 {
    debug_assert!(min <= value && value <= max, "value outside min..=max");
    (value - min) * 100.0 / (max - min)
}

/// Like [`percent_f32`] for unsigned values
pub fn percent_u32(value: u32, min: u32, max: u32) -> f32 {
    debug_assert!(min <= value && value <= max, "value outside min..=max");
    let span = max.wrapping_sub(min) as f32;
    value.wrapping_sub(min) as f32 * 100.0 / span
}

/// Like [`percent_f32`] for signed values. The span is computed in 64 bits,
/// so the full `i32` range is fine.
pub fn percent_i32(value: i32, min: i32, max: i32) -> f32 {
    debug_assert!(min <= value && value <= max, "value outside min..=max");
    let span = (i64::from(max) - i64::from(min)) as f32;
    (i64::from(value) - i64::from(min)) as f32 * 100.0 / span
}
