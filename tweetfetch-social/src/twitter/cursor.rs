//! `max_id` cursor arithmetic on decimal id strings.
//!
//! Status ids outgrow the integer range some clients can represent exactly, so
//! they stay strings here. Only the trailing ten digits take part in the
//! decrement; a borrow reaches the leading digits only when those ten digits
//! are all zero.

const TAIL_DIGITS: usize = 10;

/// The largest id strictly below `id`, or `None` when `id` is not a positive
/// decimal number.
///
/// ```
/// use tweetfetch_social::twitter::cursor::previous_id;
///
/// assert_eq!(previous_id("1234567890123").as_deref(), Some("1234567890122"));
/// ```
pub fn previous_id(id: &str) -> Option<String> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let split = id.len().saturating_sub(TAIL_DIGITS);
    let (head, tail) = id.split_at(split);
    let tail_value: u64 = tail.parse().ok()?;

    if tail_value > 0 {
        let tail = format!("{:0width$}", tail_value - 1, width = tail.len());
        return Some(strip_leading_zeros(format!("{head}{tail}")));
    }

    // Tail is all zeros: borrow from the leading digits.
    let head = previous_id(head)?;
    Some(strip_leading_zeros(format!("{head}{}", "9".repeat(tail.len()))))
}

fn strip_leading_zeros(digits: String) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
