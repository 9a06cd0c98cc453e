//! Checks run on a form before it reaches the overlap gate.

use thiserror::Error;

use crate::event::EventForm;
use crate::overlap::parse_date_time;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("필수 정보를 모두 입력해주세요.")]
    MissingRequired,

    #[error("시간 설정을 확인해주세요.")]
    InvalidTime,

    #[error("반복 설정을 확인해주세요.")]
    InvalidRepeat,
}

/// Per-field messages for a start/end pair that is out of order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeErrors {
    pub start: Option<&'static str>,
    pub end: Option<&'static str>,
}

impl TimeErrors {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Field messages for `start`/`end` times (`HH:MM`). Empty when either is
/// blank or they are in order.
pub fn time_error_message(start: &str, end: &str) -> TimeErrors {
    if start.is_empty() || end.is_empty() {
        return TimeErrors::default();
    }

    // Same placeholder day on both sides; only the clock times matter.
    let (Some(start), Some(end)) = (
        parse_date_time("1970-01-01", start).value(),
        parse_date_time("1970-01-01", end).value(),
    ) else {
        return TimeErrors::default();
    };

    if start >= end {
        TimeErrors {
            start: Some("시작 시간은 종료 시간보다 빨라야 합니다."),
            end: Some("종료 시간은 시작 시간보다 늦어야 합니다."),
        }
    } else {
        TimeErrors::default()
    }
}

/// Validate a form. `is_repeating` is whether the user asked for a repeat.
pub fn validate_form(form: &EventForm, is_repeating: bool) -> Result<(), FormError> {
    let required = [&form.title, &form.date, &form.start_time, &form.end_time];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(FormError::MissingRequired);
    }

    if !time_error_message(&form.start_time, &form.end_time).is_empty() {
        return Err(FormError::InvalidTime);
    }

    if is_repeating && form.repeat.kind.is_none() {
        return Err(FormError::InvalidRepeat);
    }

    Ok(())
}
