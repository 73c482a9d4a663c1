//! Library text search: input normalization plus lyrics-state filters.

use crate::library::Track;

/// Which lyrics states a search should include. Defaults to everything.
#[derive(Debug, Clone, Copy)]
pub struct SearchFilters {
    pub synced: bool,
    pub plain: bool,
    pub instrumental: bool,
    pub missing: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            synced: true,
            plain: true,
            instrumental: true,
            missing: true,
        }
    }
}

/// Normalize text for matching: lowercase, punctuation collapsed to spaces,
/// apostrophes dropped, whitespace runs collapsed.
pub fn normalize(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\'' | '\u{2019}' => {}
            c if c.is_alphanumeric() => {
                for lower in c.to_lowercase() {
                    cleaned.push(lower);
                }
            }
            _ => cleaned.push(' '),
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn track_kind_allowed(track: &Track, filters: &SearchFilters) -> bool {
    if track.instrumental {
        filters.instrumental
    } else if track.lrc_lyrics.is_some() {
        filters.synced
    } else if track.txt_lyrics.is_some() {
        filters.plain
    } else {
        filters.missing
    }
}

/// True when every query word occurs in the track's title/artist/album.
pub fn matches(track: &Track, query: &str, filters: &SearchFilters) -> bool {
    if !track_kind_allowed(track, filters) {
        return false;
    }
    let query = normalize(query);
    if query.is_empty() {
        return true;
    }
    let haystack = normalize(&format!(
        "{} {} {}",
        track.title, track.artist_name, track.album_name
    ));
    query.split(' ').all(|word| haystack.contains(word))
}

/// Filter a track list by query and filters, preserving order.
pub fn search<'a>(
    tracks: &'a [Track],
    query: &str,
    filters: &SearchFilters,
) -> Vec<&'a Track> {
    tracks
        .iter()
        .filter(|t| matches(t, query, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Track;

    fn track(title: &str, artist: &str, album: &str) -> Track {
        Track {
            id: 1,
            file_path: "/m/x.mp3".to_string(),
            file_name: "x.mp3".to_string(),
            title: title.to_string(),
            album_name: album.to_string(),
            artist_name: artist.to_string(),
            duration_secs: 100.0,
            txt_lyrics: None,
            lrc_lyrics: None,
            instrumental: false,
        }
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Don't Stop Me Now!"), "dont stop me now");
        assert_eq!(normalize("  AC/DC -- Back In   Black "), "ac dc back in black");
        assert_eq!(normalize("don\u{2019}t"), "dont");
    }

    #[test]
    fn every_query_word_must_match() {
        let t = track("Back in Black", "AC/DC", "Back in Black");
        let filters = SearchFilters::default();
        assert!(matches(&t, "back black", &filters));
        assert!(matches(&t, "AC/DC", &filters));
        assert!(!matches(&t, "back red", &filters));
        assert!(matches(&t, "", &filters));
    }

    #[test]
    fn filters_exclude_by_lyrics_state() {
        let mut synced = track("One", "A", "B");
        synced.lrc_lyrics = Some("[00:01.00] x".to_string());
        let missing = track("Two", "A", "B");

        let only_missing = SearchFilters {
            synced: false,
            plain: false,
            instrumental: false,
            missing: true,
        };
        let tracks = vec![synced, missing];
        let found = search(&tracks, "", &only_missing);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Two");
    }
}
