//! Candidate selection and single-line formatting of geocoding results

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{GeocodeResult, LocationType};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static REPEATED_COMMAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,(\s*,)+").unwrap());
static LEADING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*,\s*").unwrap());
static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*$").unwrap());

/// Pick the candidate that reads most like a postal address.
///
/// Results tagged `plus_code` are skipped; among the rest the order is
/// `street_address`, then `route`, then a rooftop match with a route
/// component, then anything with a route component, then the first one.
/// Returns `None` only for an empty slice.
pub fn pick_best(results: &[GeocodeResult]) -> Option<&GeocodeResult> {
    let candidates: Vec<&GeocodeResult> =
        results.iter().filter(|r| !r.has_type("plus_code")).collect();

    candidates
        .iter()
        .find(|r| r.has_type("street_address"))
        .or_else(|| candidates.iter().find(|r| r.has_type("route")))
        .or_else(|| {
            candidates.iter().find(|r| {
                r.location_type() == LocationType::Rooftop && r.has_component("route")
            })
        })
        .or_else(|| candidates.iter().find(|r| r.has_component("route")))
        .or_else(|| candidates.first())
        .copied()
        .or_else(|| results.first())
}

/// Build "street number y cross, sublocality, city, province, postal country".
/// Empty when the result carries none of those components.
pub fn format_address(result: &GeocodeResult) -> String {
    let number = result.component("street_number");
    let routes = result.components("route");
    let route = routes.first().copied();
    let cross = routes.get(1).copied();

    let mut line1 = match (route, number) {
        (Some(route), Some(number)) => format!("{route} {number}"),
        (Some(route), None) => route.to_string(),
        _ => String::new(),
    };
    if let Some(cross) = cross {
        line1 = format!("{line1} y {cross}");
    }

    let sublocality = result
        .component("sublocality")
        .or_else(|| result.component("sublocality_level_1"));
    let area = [
        sublocality,
        result.component("locality"),
        result.component("administrative_area_level_1"),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(", ");

    let postal = [result.component("postal_code"), result.component("country")]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    [line1, area, postal]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collapse whitespace and repeated commas, drop dangling commas
pub fn sanitize_line(line: &str) -> String {
    let line = WHITESPACE.replace_all(line, " ");
    let line = REPEATED_COMMAS.replace_all(&line, ", ");
    let line = LEADING_COMMA.replace(&line, "");
    let line = TRAILING_COMMA.replace(&line, "");
    WHITESPACE.replace_all(line.trim(), " ").into_owned()
}
