//! Source manifest: one `label, location` pair per line.
//!
//! ```text
//! # date, table location
//! 2/7, ./data/0207.csv
//! 2/14, https://hall.example/2921029/?kishu=マイジャグラーV
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Model name used when a location carries no `kishu` parameter.
pub const DEFAULT_LOCATION_MODEL: &str = "マイジャグラーV";

/// Query parameter naming the machine model.
const MODEL_QUERY_KEY: &str = "kishu";

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTarget {
    /// Date label attached to every record from this source.
    pub label: String,
    pub location: String,
}

/// Where a location points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Path(PathBuf),
    Remote(Url),
}

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches('"').trim_matches('\'')
}

/// Parse manifest text.
///
/// Blank lines and `#` comments are skipped. Each line splits at its first
/// comma; lines without a non-empty location are ignored.
pub fn parse_manifest(text: &str) -> Vec<SourceTarget> {
    strip_quotes(text)
        .lines()
        .map(strip_quotes)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (label, location) = line.split_once(',')?;
            let location = location.trim();
            if location.is_empty() {
                return None;
            }
            Some(SourceTarget {
                label: label.trim().to_string(),
                location: location.to_string(),
            })
        })
        .collect()
}

/// Model name carried by a location's `kishu` query parameter.
///
/// Anything else (no parameter, a plain path, an unparseable URL) yields
/// [`DEFAULT_LOCATION_MODEL`].
pub fn model_from_location(location: &str) -> String {
    Url::parse(location)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == MODEL_QUERY_KEY)
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or_else(|| DEFAULT_LOCATION_MODEL.to_string())
}

/// Classify a location as a local path or a remote URL.
///
/// `file://` URLs become paths; strings that are not URLs are taken as paths.
pub fn classify_location(location: &str) -> Location {
    match Url::parse(location) {
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => Location::Path(path),
            Err(()) => Location::Path(PathBuf::from(url.path())),
        },
        // A one-letter scheme is a Windows drive letter, not a URL.
        Ok(url) if url.scheme().len() > 1 => Location::Remote(url),
        _ => Location::Path(PathBuf::from(location)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_and_skips_noise() {
        let text = "\"\n# header\n2/7, a.csv\n\n2/14 ,  b.csv \nbad line\n2/21,\n'2/28, c.csv'\n\"";
        let targets = parse_manifest(text);
        assert_eq!(
            targets,
            vec![
                SourceTarget {
                    label: "2/7".into(),
                    location: "a.csv".into()
                },
                SourceTarget {
                    label: "2/14".into(),
                    location: "b.csv".into()
                },
                SourceTarget {
                    label: "2/28".into(),
                    location: "c.csv".into()
                },
            ]
        );
    }

    #[test]
    fn splits_at_first_comma_only() {
        let targets = parse_manifest("2/7, https://x.example/?a=1,2");
        assert_eq!(targets[0].location, "https://x.example/?a=1,2");
    }

    #[test]
    fn model_from_query_is_percent_decoded() {
        let loc = "https://hall.example/2906014/?kishu=%E3%83%95%E3%82%A1%E3%83%B3%E3%82%AD%E3%83%BC";
        assert_eq!(model_from_location(loc), "ファンキー");
        assert_eq!(
            model_from_location("https://hall.example/1/?kishu=マイジャグラーV&x=1"),
            "マイジャグラーV"
        );
    }

    #[test]
    fn model_defaults_without_parameter() {
        assert_eq!(model_from_location("https://hall.example/1/"), DEFAULT_LOCATION_MODEL);
        assert_eq!(model_from_location("./data/0207.csv"), DEFAULT_LOCATION_MODEL);
        assert_eq!(model_from_location("::not a url::"), DEFAULT_LOCATION_MODEL);
    }

    #[test]
    fn classify_paths_and_urls() {
        assert_eq!(
            classify_location("data/0207.csv"),
            Location::Path(PathBuf::from("data/0207.csv"))
        );
        assert!(matches!(
            classify_location("https://hall.example/1/"),
            Location::Remote(_)
        ));
        assert_eq!(
            classify_location("file:///tmp/t.csv?kishu=x"),
            Location::Path(PathBuf::from("/tmp/t.csv"))
        );
    }
}
