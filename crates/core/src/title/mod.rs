//! Title cleaning for output file names and tags.
//!
//! Download-style names ("Song Name (Official Video) [4K] ft. Someone")
//! become a short title ("Song Name") used both as the output file stem
//! and as `title`/`artist` metadata. Names are folded to NFKD first and
//! combining diacritics (U+0300..U+036F) dropped, so "Café" becomes "Cafe".

use once_cell::sync::Lazy;
use regex_lite::Regex;
use unicode_normalization::UnicodeNormalization;

/// Turns a raw base name into a clean title. Must be pure.
pub trait TitleNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> String;
}

/// Words that only ever describe the upload, never the song.
pub const NOISE_WORDS: &[&str] = &[
    "movie", "film", "official", "lyrics", "lyric", "video", "music", "hd", "uhd", "4k",
    "1080p", "720p", "karaoke", "audio", "remix", "rework", "reboot", "revisit", "bootleg",
    "edit", "extended", "version", "visualizer", "teaser", "trailer", "status", "dj", "mix",
    "song", "songs", "full", "mv", "original", "starring", "starrer", "new", "latest",
    "exclusive", "album", "track", "hit", "hits", "single", "bgm", "theme", "intro", "outro",
    "ending", "title", "cover", "performance", "live", "show", "session", "concert", "reaction",
    "behind", "scenes", "officially", "release", "leak", "leaked", "update", "launch",
    "dialogue", "dance", "choreography", "practice",
];

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[(].*?[\])]").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_]").unwrap());
static FEATURING_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:ft|feat|featuring|vs|x|and|with|by)\b.*$").unwrap());

/// Default normaliser: strips bracketed tags, featuring credits and noise words.
pub struct NoiseWordCleaner {
    noise: Regex,
}

impl Default for NoiseWordCleaner {
    fn default() -> Self {
        Self::with_extra_words::<&str>(&[])
    }
}

impl NoiseWordCleaner {
    /// Builds a cleaner that also strips `extra` (case-insensitive, whole words).
    pub fn with_extra_words<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut words: Vec<String> = NOISE_WORDS.iter().map(|w| w.to_string()).collect();
        words.extend(
            extra
                .iter()
                .map(|w| w.as_ref().trim())
                .filter(|w| !w.is_empty())
                .map(|w| {
                    w.split_whitespace()
                        .map(escape)
                        .collect::<Vec<_>>()
                        .join(r"\s+")
                }),
        );
        // Longest first so multi-word entries win over their prefixes
        words.sort_by_key(|w| std::cmp::Reverse(w.len()));

        let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
        let noise = Regex::new(&pattern).unwrap_or_else(|_| {
            Regex::new(&format!(r"(?i)\b(?:{})\b", NOISE_WORDS.join("|"))).unwrap()
        });
        Self { noise }
    }
}

fn escape(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        if c.is_ascii_punctuation() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl TitleNormalizer for NoiseWordCleaner {
    fn normalize(&self, raw: &str) -> String {
        let folded = fold_diacritics(raw);
        let s = BRACKETED.replace_all(&folded, "");
        let s = SEPARATORS.replace_all(&s, " ");
        let s = FEATURING_TAIL.replace(&s, "");
        let s = self.noise.replace_all(&s, "");

        let kept: String = s
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        kept.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// NFKD with the Latin combining diacritics removed. Other combining marks
/// (Indic vowel signs and the like) are part of the letters and stay.
fn fold_diacritics(raw: &str) -> String {
    raw.nfkd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Normalises `raw`, falling back to the trimmed raw name when nothing survives.
pub fn clean_title(normalizer: &dyn TitleNormalizer, raw: &str) -> String {
    let clean = normalizer.normalize(raw);
    if clean.is_empty() {
        raw.trim().to_string()
    } else {
        clean
    }
}
