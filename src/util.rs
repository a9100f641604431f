const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the UTF-8 bytes. Fixed across builds and platforms.
pub fn stable_hash(id: &str) -> u64 {
    id.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Maps an identifier onto `[0, 1)` with a hash that is stable across runs.
pub fn stable_unit(id: &str) -> f64 {
    (stable_hash(id) >> 11) as f64 / (1u64 << 53) as f64
}

pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

pub fn truncate_label(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_owned();
    }

    let mut out = trimmed
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}

/// Greedy word wrap used by the card tiers; stops after `max_lines`.
pub fn wrap_words(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            lines.push(truncate_label(&std::mem::take(&mut current), max_chars));
            if lines.len() == max_lines {
                if let Some(last) = lines.last_mut() {
                    *last = truncate_label(&format!("{last} {word}"), max_chars);
                }
                return lines;
            }
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() && lines.len() < max_lines {
        lines.push(truncate_label(&current, max_chars));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_hash_matches_fnv1a_reference_values() {
        assert_eq!(stable_hash(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(stable_hash("a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(stable_hash("foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn stable_unit_is_deterministic_and_bounded() {
        let a = stable_unit("o:km.1234");
        assert_eq!(a, stable_unit("o:km.1234"));
        assert!((0.0..1.0).contains(&a));
    }

    #[test]
    fn truncate_label_keeps_short_text() {
        assert_eq!(truncate_label("  Pistole ", 10), "Pistole");
        assert_eq!(truncate_label("Flobertpistole", 6), "Flobe…");
    }

    #[test]
    fn wrap_words_respects_line_budget() {
        let lines = wrap_words("ein sehr langer Text über eine Wilderei im Gebirge", 12, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.chars().count() <= 12));
    }
}
