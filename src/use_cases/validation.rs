// Input checks shared by the owner-side use cases.

use crate::domain::errors::AppError;

const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "youtu.be",
    "vimeo.com",
    "www.vimeo.com",
    "player.vimeo.com",
];

// Trims and enforces a character-count range.
pub(crate) fn bounded_text(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, AppError> {
    let trimmed = value.trim();
    let count = trimmed.chars().count();
    if count < min || count > max {
        return Err(AppError::InvalidContent(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn phone(value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let valid = (8..=20).contains(&trimmed.len())
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(AppError::InvalidContent(
            "phone must be 8 to 20 digits with an optional leading +".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

// Empty or blank input clears the field.
pub(crate) fn optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => bounded_text(field, &value, 1, max).map(Some),
        _ => Ok(None),
    }
}

// `#RGB` or `#RRGGBB`.
pub(crate) fn hex_color(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    let valid = match trimmed.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    };
    if !valid {
        return Err(AppError::InvalidContent(format!(
            "{field} must be #RGB or #RRGGBB"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn http_url(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if url_host(trimmed).is_none() {
        return Err(AppError::InvalidContent(format!(
            "{field} must be an http(s) URL"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn video_url(value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    match url_host(trimmed) {
        Some(host) if VIDEO_HOSTS.contains(&host.to_ascii_lowercase().as_str()) => {
            Ok(trimmed.to_string())
        }
        _ => Err(AppError::InvalidContent(
            "video_url must be a YouTube or Vimeo link".to_string(),
        )),
    }
}

fn url_host(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?.split(':').next()?;
    (!host.is_empty() && !url.chars().any(char::is_whitespace)).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_text_is_padded_then_it_is_trimmed_before_counting() {
        assert_eq!(bounded_text("name", "  Ana  ", 1, 3).unwrap(), "Ana");
        assert!(bounded_text("name", "   ", 1, 100).is_err());
        assert!(bounded_text("name", "abcd", 1, 3).is_err());
    }

    #[test]
    fn when_optional_text_is_blank_then_it_clears() {
        assert_eq!(optional_text("note", Some("  ".to_string()), 10).unwrap(), None);
        assert_eq!(optional_text("note", None, 10).unwrap(), None);
        assert_eq!(
            optional_text("note", Some(" sem gluten ".to_string()), 20).unwrap(),
            Some("sem gluten".to_string())
        );
        assert!(optional_text("note", Some("x".repeat(11)), 10).is_err());
    }

    #[test]
    fn phone_accepts_digits_with_optional_plus() {
        assert_eq!(phone("+5591988887777").unwrap(), "+5591988887777");
        assert!(phone("91988887777").is_ok());
        assert!(phone("1234567").is_err());
        assert!(phone("+55 91 98888").is_err());
        assert!(phone("+").is_err());
    }

    #[test]
    fn hex_color_accepts_short_and_long_forms() {
        assert!(hex_color("color", "#FFF").is_ok());
        assert!(hex_color("color", "#a1b2c3").is_ok());
        assert!(hex_color("color", "FFFFFF").is_err());
        assert!(hex_color("color", "#FFFF").is_err());
        assert!(hex_color("color", "#GGGGGG").is_err());
    }

    #[test]
    fn video_url_only_allows_youtube_and_vimeo() {
        assert!(video_url("https://www.youtube.com/watch?v=abc").is_ok());
        assert!(video_url("https://youtu.be/abc").is_ok());
        assert!(video_url("https://vimeo.com/123").is_ok());
        assert!(video_url("https://example.com/video.mp4").is_err());
        assert!(video_url("ftp://youtube.com/x").is_err());
    }

    #[test]
    fn http_url_requires_scheme_and_host() {
        assert!(http_url("image", "https://cdn.example.com/a.png").is_ok());
        assert!(http_url("image", "http://localhost:8080/a.png").is_ok());
        assert!(http_url("image", "cdn.example.com/a.png").is_err());
        assert!(http_url("image", "https:///a.png").is_err());
    }
}
