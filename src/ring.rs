//! Button ring geometry
//!
//! The eight buttons sit on a ring, indexed 0-7 going clockwise. Slide
//! shapes are classified by how many steps a traversal takes in each
//! direction and by which way the shorter arc runs.

/// Number of buttons on the ring
pub const RING_SIZE: u8 = 8;

/// Number of steps from `start` to `end` walking the ring in the given
/// direction. Zero iff `start == end`, otherwise the clockwise and
/// counter-clockwise distances sum to the ring size.
pub fn distance(start: u8, end: u8, clockwise: bool) -> u8 {
    let steps = (end as i32 - start as i32).rem_euclid(RING_SIZE as i32) as u8;
    if clockwise {
        steps
    } else {
        (RING_SIZE - steps) % RING_SIZE
    }
}

/// Whether the shorter arc from `start` to `end` runs clockwise.
/// An exact antipodal tie resolves clockwise.
pub fn is_clockwise(start: u8, end: u8) -> bool {
    distance(start, end, true) <= distance(start, end, false)
}
