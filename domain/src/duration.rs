//! Course duration helpers. Durations are whole minutes.

pub use entity::lessons::total_duration as total;

/// Human readable duration: `"45min"`, `"2h"`, `"2h 30min"`. Zero and
/// negative inputs render as `"0min"`.
pub fn format(minutes: i32) -> String {
    let minutes = minutes.max(0);
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, rest) => format!("{rest}min"),
        (hours, 0) => format!("{hours}h"),
        (hours, rest) => format!("{hours}h {rest}min"),
    }
}
