//! Field parsers turning the free-text columns into typed values.
//!
//! None of these functions fail: text that matches no recognised pattern
//! maps to a sentinel (`None`, `"?"` or `Unrated`).

use super::record::{RatingTier, TechMeta, UNKNOWN_FIELD};
use lazy_static::lazy_static;
use regex::Regex;

/// Delimiter between the sections of the technical-metadata field.
pub const TECH_SECTION_DELIMITER: char = '|';

/// Separator between the byte count and the external id in a compound id.
pub const COMPOUND_ID_SEPARATOR: &str = "*§*";

const RESOLUTION_POSITION: usize = 3;

lazy_static! {
    static ref CLOCK_DURATION: Regex =
        Regex::new(r"^\s*(\d{1,2}):(\d{2}):(\d{2})(?:[.,]\d+)?\s*$")
            .expect("Failed to create clock duration regex");
    static ref HOURS_PART: Regex = Regex::new(r"(?i)(\d+)\s*h(?:ours?|rs?)?(?:[^a-z]|$)")
        .expect("Failed to create hours regex");
    static ref MINUTES_PART: Regex =
        Regex::new(r"(?i)(\d+)\s*min").expect("Failed to create minutes regex");
    static ref EXTERNAL_ID: Regex =
        Regex::new(r"(tt\d{7,9})(?:\D|$)").expect("Failed to create external id regex");
}

/// Parse a duration into whole minutes.
///
/// Accepts `H:MM:SS` / `HH:MM:SS`, optionally with fractional seconds (seconds
/// are dropped), or any mix of `<N> h` and `<N> min` parts.
pub fn parse_duration(raw: &str) -> Option<u32> {
    let total = if let Some(caps) = CLOCK_DURATION.captures(raw) {
        let hours: u32 = caps[1].parse().ok()?;
        let minutes: u32 = caps[2].parse().ok()?;
        hours.checked_mul(60)?.checked_add(minutes)?
    } else {
        let hours = first_number(&HOURS_PART, raw);
        let minutes = first_number(&MINUTES_PART, raw);
        hours.saturating_mul(60).saturating_add(minutes)
    };

    if total > 0 {
        Some(total)
    } else {
        None
    }
}

fn first_number(re: &Regex, raw: &str) -> u32 {
    re.captures(raw)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Parse the `|`-delimited technical-metadata field.
///
/// Positions are fixed for the duration (0) and resolution (3) sections,
/// while the codec is searched for in every section.
pub fn parse_tech_meta(raw: &str) -> TechMeta {
    if raw.trim().is_empty() {
        return TechMeta::default();
    }

    let tokens: Vec<&str> = raw.split(TECH_SECTION_DELIMITER).map(str::trim).collect();

    TechMeta {
        duration_token: token_or_unknown(tokens.first().copied()),
        resolution: token_or_unknown(tokens.get(RESOLUTION_POSITION).copied()),
        codec: detect_codec(&tokens).to_string(),
        file_name: tokens
            .last()
            .map(|last| base_name(last))
            .map(|name| token_or_unknown(Some(name)))
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
    }
}

fn token_or_unknown(token: Option<&str>) -> String {
    match token {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => UNKNOWN_FIELD.to_string(),
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path).trim()
}

struct CodecRule {
    label: &'static str,
    matches: fn(&str) -> bool,
}

fn is_hevc(token: &str) -> bool {
    ["HEVC", "H265", "H.265", "X265"]
        .iter()
        .any(|m| token.contains(m))
}

fn is_hevc_main10(token: &str) -> bool {
    is_hevc(token) && (token.contains("MAIN 10") || token.contains("MAIN10"))
}

fn is_avc(token: &str) -> bool {
    ["AVC", "H264", "H.264", "X264"]
        .iter()
        .any(|m| token.contains(m))
}

fn is_av1(token: &str) -> bool {
    token.contains("AV1")
}

// Ordered by precedence: the first rule matching any token wins.
const CODEC_RULES: [CodecRule; 4] = [
    CodecRule {
        label: "HEVC Main 10",
        matches: is_hevc_main10,
    },
    CodecRule {
        label: "HEVC",
        matches: is_hevc,
    },
    CodecRule {
        label: "AVC",
        matches: is_avc,
    },
    CodecRule {
        label: "AV1",
        matches: is_av1,
    },
];

fn detect_codec(tokens: &[&str]) -> &'static str {
    let upper: Vec<String> = tokens.iter().map(|t| t.to_uppercase()).collect();
    CODEC_RULES
        .iter()
        .find(|rule| upper.iter().any(|t| (rule.matches)(t)))
        .map(|rule| rule.label)
        .unwrap_or(UNKNOWN_FIELD)
}

/// Format the byte count carried by a compound id (`<bytes>*§*<id>`),
/// grouping thousands with `.`.
pub fn format_file_size(compound_id: &str) -> String {
    let digits = compound_id
        .split(COMPOUND_ID_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return UNKNOWN_FIELD.to_string();
    }

    match digits.parse::<u64>() {
        Ok(bytes) => group_thousands(bytes),
        Err(_) => UNKNOWN_FIELD.to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

pub fn classify_rating(code: &str) -> RatingTier {
    RatingTier::from_code(code)
}

/// Extract the first IMDb-style identifier (`tt` + 7 to 9 digits).
///
/// Longer digit runs are not identifiers and are skipped rather than cut.
pub fn extract_external_id(link: &str) -> Option<String> {
    EXTERNAL_ID
        .captures(link)
        .map(|caps| caps[1].to_string())
}

/// Parse a year, tolerating the `1994.0` rendering of REAL columns.
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return (year > 0).then_some(year);
    }
    let value: f64 = raw.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value > 0.0 && value < i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_durations_drop_seconds() {
        assert_eq!(parse_duration("01:43:49"), Some(103));
        assert_eq!(parse_duration("2:05:59"), Some(125));
        assert_eq!(parse_duration(" 00:45:00 "), Some(45));
    }

    #[test]
    fn clock_durations_accept_fractional_seconds() {
        assert_eq!(parse_duration("01:43:49.123"), Some(103));
        assert_eq!(parse_duration("2:05:59,5"), Some(125));
        assert_eq!(parse_duration("01:43:49."), None);
    }

    #[test]
    fn hour_and_minute_parts_are_summed() {
        assert_eq!(parse_duration("1 h 47 min"), Some(107));
        assert_eq!(parse_duration("47 min 1 h"), Some(107));
        assert_eq!(parse_duration("1h47min"), Some(107));
        assert_eq!(parse_duration("2 H"), Some(120));
        assert_eq!(parse_duration("45 min"), Some(45));
        assert_eq!(parse_duration("1 hour 30 minutes"), Some(90));
    }

    #[test]
    fn unrecognised_durations_are_unknown() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("unknown"), None);
        assert_eq!(parse_duration("0 min"), None);
        assert_eq!(parse_duration("00:00:30"), None);
    }

    #[test]
    fn tech_meta_positions() {
        let meta = parse_tech_meta(
            "01:43:49 | MKV | | 1920x1080 | AVC High@L4.1 | D:\\Films\\Rebecca (1940).mkv",
        );
        assert_eq!(meta.duration_token, "01:43:49");
        assert_eq!(meta.resolution, "1920x1080");
        assert_eq!(meta.codec, "AVC");
        assert_eq!(meta.file_name, "Rebecca (1940).mkv");
    }

    #[test]
    fn tech_meta_missing_sections_default_to_unknown() {
        let meta = parse_tech_meta("01:10:00|MKV");
        assert_eq!(meta.duration_token, "01:10:00");
        assert_eq!(meta.resolution, "?");
        assert_eq!(meta.codec, "?");
        assert_eq!(meta.file_name, "MKV");

        assert_eq!(parse_tech_meta(""), TechMeta::default());

        let meta = parse_tech_meta("|||");
        assert_eq!(meta.duration_token, "?");
        assert_eq!(meta.resolution, "?");
        assert_eq!(meta.file_name, "?");
    }

    #[test]
    fn hevc_wins_over_avc_regardless_of_order() {
        let meta = parse_tech_meta("1:00:00|x|y|1280x720|AVC|HEVC|/films/a.mkv");
        assert_eq!(meta.codec, "HEVC");
        let meta = parse_tech_meta("1:00:00|x|y|1280x720|h265|h264|/films/a.mkv");
        assert_eq!(meta.codec, "HEVC");
    }

    #[test]
    fn hevc_main10_is_detected() {
        let meta = parse_tech_meta("1:00:00|||3840x2160|AVC|HEVC Main 10@L5.1|/films/a.mkv");
        assert_eq!(meta.codec, "HEVC Main 10");
        let meta = parse_tech_meta("1:00:00|||3840x2160|H265 main10|/films/a.mkv");
        assert_eq!(meta.codec, "HEVC Main 10");
    }

    #[test]
    fn av1_is_last_in_precedence() {
        let meta = parse_tech_meta("1:00:00|||1920x1080|AV1|/films/a.mkv");
        assert_eq!(meta.codec, "AV1");
        let meta = parse_tech_meta("1:00:00|||1920x1080|AV1|AVC|/films/a.mkv");
        assert_eq!(meta.codec, "AVC");
    }

    #[test]
    fn formats_file_size_with_dots() {
        assert_eq!(format_file_size("31001977235*§*tt0032138"), "31.001.977.235");
        assert_eq!(format_file_size("999*§*tt0032138"), "999");
        assert_eq!(format_file_size("1000"), "1.000");
    }

    #[test]
    fn malformed_file_size_is_unknown() {
        assert_eq!(format_file_size("abc*§*tt0032138"), "?");
        assert_eq!(format_file_size("12ab*§*tt0032138"), "?");
        assert_eq!(format_file_size(""), "?");
        assert_eq!(format_file_size("*§*tt0032138"), "?");
    }

    #[test]
    fn extracts_first_external_id() {
        assert_eq!(
            extract_external_id("https://www.imdb.com/title/tt0032138/"),
            Some("tt0032138".to_string())
        );
        assert_eq!(
            extract_external_id("tt12345678 and tt7654321"),
            Some("tt12345678".to_string())
        );
        assert_eq!(extract_external_id("https://example.com/tt123"), None);
        assert_eq!(extract_external_id(""), None);
    }

    #[test]
    fn overlong_external_ids_are_not_truncated() {
        assert_eq!(extract_external_id("tt1234567890"), None);
        assert_eq!(
            extract_external_id("tt1234567890 https://www.imdb.com/title/tt0032138/"),
            Some("tt0032138".to_string())
        );
        assert_eq!(
            extract_external_id("tt123456789"),
            Some("tt123456789".to_string())
        );
    }

    #[test]
    fn parses_years() {
        assert_eq!(parse_year("1940"), Some(1940));
        assert_eq!(parse_year(" 1994.0 "), Some(1994));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("n/a"), None);
        assert_eq!(parse_year("1994.5"), None);
    }
}
