//! Pure display formatters shared by the renderer and the overlays.

use unicode_width::UnicodeWidthChar;

use crate::constants::BYTE_UNITS;
use crate::models::PortBinding;

const SPINNER_CHARS: &[&str] = &["◐", "◓", "◑", "◒"];

/// Human-readable size with binary (1024) units and one decimal place.
///
/// The unit is the largest one for which the scaled value stays below 1024,
/// capped at TB.
pub fn humanize_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, BYTE_UNITS[unit])
}

/// CPU percentage with one decimal place.
pub fn format_cpu(percent: f64) -> String {
    format!("{:.1}", percent)
}

/// `local → remote` when a remote endpoint exists, otherwise `local`.
pub fn port_label(port: &PortBinding) -> String {
    match port.remote.as_deref() {
        Some(remote) if !remote.is_empty() => format!("{} → {}", port.local, remote),
        _ => port.local.clone(),
    }
}

/// Command line arguments joined with single spaces.
pub fn join_cmdline(args: &[String]) -> String {
    args.join(" ")
}

/// Parse the nice editor text the way a browser `parseInt` would:
/// optional sign followed by leading digits. Anything else is 0.
pub fn parse_nice(input: &str) -> i32 {
    let s = input.trim();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i32>().map(|v| sign * v).unwrap_or(0)
}

/// Truncate to `max_width` terminal columns, appending "…" when cut.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Mask a secret for display, keeping its length visible.
pub fn mask_secret(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}

/// Get the spinner character for the current tick.
pub fn spinner_char(tick: u64) -> &'static str {
    SPINNER_CHARS[(tick % SPINNER_CHARS.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── humanize_bytes ────────────────────────────────────────────

    #[test]
    fn humanize_bytes_small_values_stay_in_bytes() {
        assert_eq!(humanize_bytes(0), "0.0 B");
        assert_eq!(humanize_bytes(1023), "1023.0 B");
    }

    #[test]
    fn humanize_bytes_switches_unit_at_1024() {
        assert_eq!(humanize_bytes(1024), "1.0 KB");
        assert_eq!(humanize_bytes(1536), "1.5 KB");
        assert_eq!(humanize_bytes(1_048_576), "1.0 MB");
        assert_eq!(humanize_bytes(1_073_741_824), "1.0 GB");
    }

    #[test]
    fn humanize_bytes_caps_at_tb() {
        let pb = 1024u64.pow(5);
        assert_eq!(humanize_bytes(pb), "1024.0 TB");
    }

    // ── port_label ────────────────────────────────────────────────

    #[test]
    fn port_label_with_remote() {
        let p = PortBinding {
            local: "10.0.0.2:443".to_string(),
            remote: Some("10.0.0.9:50000".to_string()),
            status: Some("ESTABLISHED".to_string()),
        };
        assert_eq!(port_label(&p), "10.0.0.2:443 → 10.0.0.9:50000");
    }

    #[test]
    fn port_label_local_only() {
        let p = PortBinding {
            local: "0.0.0.0:22".to_string(),
            remote: None,
            status: None,
        };
        assert_eq!(port_label(&p), "0.0.0.0:22");
    }

    // ── parse_nice ────────────────────────────────────────────────

    #[test]
    fn parse_nice_blank_is_zero() {
        assert_eq!(parse_nice(""), 0);
        assert_eq!(parse_nice("   "), 0);
    }

    #[test]
    fn parse_nice_non_numeric_is_zero() {
        assert_eq!(parse_nice("abc"), 0);
        assert_eq!(parse_nice("-"), 0);
        assert_eq!(parse_nice("x5"), 0);
    }

    #[test]
    fn parse_nice_reads_signed_leading_digits() {
        assert_eq!(parse_nice("10"), 10);
        assert_eq!(parse_nice("-5"), -5);
        assert_eq!(parse_nice("+3"), 3);
        assert_eq!(parse_nice(" 7abc"), 7);
    }

    // ── truncate_str ──────────────────────────────────────────────

    #[test]
    fn truncate_str_short_unchanged() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn truncate_str_adds_ellipsis() {
        assert_eq!(truncate_str("hello world", 8), "hello w…");
        assert_eq!(truncate_str("abcdef", 0), "");
    }

    #[test]
    fn truncate_str_counts_wide_chars() {
        // each CJK char is two columns wide
        assert_eq!(truncate_str("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn mask_secret_keeps_length() {
        assert_eq!(mask_secret("abc"), "•••");
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn spinner_char_cycles() {
        assert_eq!(spinner_char(0), "◐");
        assert_eq!(spinner_char(3), "◒");
        assert_eq!(spinner_char(4), "◐");
    }
}
