//! Stateless services behind the `/api/input/*` endpoints.

use crate::dto::input::{
    ChangeRequest, ClampRequest, ClampResponse, DateRequest, DateResponse, KeyPressRequest,
    KeyPressResponse,
};
use crate::input::date::{format_date_input, iso_to_display, parse_date_input};
use crate::input::{ChangeOutcome, Exceeded};

/// Runs a raw change through the configured restriction, clamp and mask.
pub fn apply_change(request: ChangeRequest) -> ChangeOutcome {
    let outcome = request.config.on_change(&request.value);
    if let Some(removed) = &outcome.removed {
        log::debug!("Input filter removed {removed:?}");
    }
    outcome
}

pub fn check_key(request: KeyPressRequest) -> KeyPressResponse {
    KeyPressResponse {
        allowed: request.config.on_key(&request.event),
    }
}

pub fn clamp_value(request: ClampRequest) -> ClampResponse {
    let mut exceeded = None;
    let value = request
        .bounds
        .clamp(&request.value, |value, bound| exceeded = Some(Exceeded { value, bound }));
    ClampResponse { value, exceeded }
}

/// Masks raw typing into the requested display format.
pub fn format_date(request: DateRequest) -> DateResponse {
    DateResponse {
        value: format_date_input(&request.value, request.format),
    }
}

/// Converts a masked display value to ISO `yyyy-mm-dd`.
pub fn parse_date(request: DateRequest) -> DateResponse {
    DateResponse {
        value: parse_date_input(&request.value, request.format),
    }
}

/// Renders a stored ISO date in the requested display format.
pub fn display_date(request: DateRequest) -> DateResponse {
    DateResponse {
        value: iso_to_display(&request.value, request.format),
    }
}
