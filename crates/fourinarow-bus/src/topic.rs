//! Topic patterns

/// Separator between topic levels
pub const SEPARATOR: u8 = b'/';

/// Single-level wildcard
pub const WILDCARD: &[u8] = b"+";

/// Whether `topic` matches `pattern`
///
/// Levels are compared one by one; a `+` level in the pattern matches any
/// single level of the topic, including an empty one.
pub fn matches(pattern: &[u8], topic: &[u8]) -> bool {
    let mut pattern_levels = pattern.split(|&b| b == SEPARATOR);
    let mut topic_levels = topic.split(|&b| b == SEPARATOR);
    loop {
        match (pattern_levels.next(), topic_levels.next()) {
            (None, None) => return true,
            (Some(p), Some(t)) if p == WILDCARD || p == t => continue,
            _ => return false,
        }
    }
}

/// Join topic levels with `/`
pub fn join(levels: &[&[u8]]) -> Vec<u8> {
    levels.join(&SEPARATOR)
}
