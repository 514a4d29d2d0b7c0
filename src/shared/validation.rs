use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slugs supplied by clients
    /// Must be lowercase alphanumeric with single hyphens
    /// - Valid: "generation-de-video", "ai4video", "text-to-video-2"
    /// - Invalid: "-video", "video-", "video--ai", "Video", "video_ai"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}
