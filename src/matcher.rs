//! URL pattern matching for the source-specific extractors.
//!
//! Every function here is pure: it looks at the URL text only. The host is
//! checked first, so a foreign domain never reaches the path patterns.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

pub const REDDIT_HOSTS: &[&str] = &["reddit.com"];
pub const TWITTER_HOSTS: &[&str] = &["twitter.com", "x.com"];
pub const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be"];
const YOUTUBE_SHORT_HOST: &str = "youtu.be";

/// `/comments/{post}` optionally followed by `/{slug}/{comment}`.
static REDDIT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/comments/([A-Za-z0-9]+)(?:/[^/]*/([A-Za-z0-9]+))?").expect("valid regex")
});

static TWEET_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/status(?:es)?/([^/]+)").expect("valid regex"));

/// Path prefixes on the long YouTube host whose next segment is a video id.
const YOUTUBE_ID_PREFIXES: &[&str] = &["shorts", "embed", "live", "v"];

/// A Reddit "thing" named by a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedditThingId {
    Post(String),
    Comment { post_id: String, comment_id: String },
}

impl RedditThingId {
    /// Reddit fullname used by `/api/info` (`t3_` posts, `t1_` comments).
    pub fn fullname(&self) -> String {
        match self {
            Self::Post(id) => format!("t3_{id}"),
            Self::Comment { comment_id, .. } => format!("t1_{comment_id}"),
        }
    }

    /// Upstream-native id of the thing itself.
    pub fn id(&self) -> &str {
        match self {
            Self::Post(id) => id,
            Self::Comment { comment_id, .. } => comment_id,
        }
    }
}

/// Case-insensitive domain suffix check on a parsed URL.
///
/// `reddit.com` matches `reddit.com` and `old.reddit.com`, not `notreddit.com`.
pub fn host_matches(url: &Url, domains: &[&str]) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let host = host.trim_end_matches('.');
    domains.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|rest| rest.ends_with('.'))
    })
}

fn parse_on_hosts(link: &str, domains: &[&str]) -> Option<Url> {
    let url = Url::parse(link).ok()?;
    host_matches(&url, domains).then_some(url)
}

/// Post or comment named by a Reddit URL.
pub fn reddit_thing(link: &str) -> Option<RedditThingId> {
    let url = parse_on_hosts(link, REDDIT_HOSTS)?;
    let caps = REDDIT_PATH.captures(url.path())?;
    let post_id = caps.get(1)?.as_str().to_string();

    match caps.get(2).map(|m| m.as_str()) {
        Some(comment_id) if !comment_id.is_empty() => Some(RedditThingId::Comment {
            post_id,
            comment_id: comment_id.to_string(),
        }),
        _ => Some(RedditThingId::Post(post_id)),
    }
}

/// Numeric status id of a tweet URL. Non-numeric ids do not match.
pub fn tweet_id(link: &str) -> Option<u64> {
    let url = parse_on_hosts(link, TWITTER_HOSTS)?;
    let caps = TWEET_PATH.captures(url.path())?;
    caps.get(1)?.as_str().parse().ok()
}

/// Video id of a YouTube URL.
///
/// The `v` query parameter wins. Otherwise the short host uses its last path
/// segment and the long host accepts `/shorts/{id}`, `/embed/{id}` and
/// `/live/{id}`. The id itself is not validated.
pub fn youtube_video_id(link: &str) -> Option<String> {
    let url = parse_on_hosts(link, YOUTUBE_HOSTS)?;

    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        if !v.is_empty() {
            return Some(v.into_owned());
        }
    }

    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();

    if host_matches(&url, &[YOUTUBE_SHORT_HOST]) {
        return segments.last().map(|s| (*s).to_string());
    }

    match segments.as_slice() {
        [prefix, id, ..] if YOUTUBE_ID_PREFIXES.contains(prefix) => Some((*id).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reddit_post_url_has_no_comment() {
        let thing = reddit_thing(
            "https://www.reddit.com/r/boardgames/comments/jn78c5/the_3_minute_board_games_top_100_games_2020/",
        );
        assert_eq!(thing, Some(RedditThingId::Post("jn78c5".to_string())));
    }

    #[test]
    fn reddit_comment_url_selects_comment() {
        let thing = reddit_thing(
            "https://www.reddit.com/r/wholesomememes/comments/jni5k5/i_love_my_dad/gb1mxkl?utm_source=share&utm_medium=web2x&context=3",
        )
        .unwrap();
        assert_eq!(
            thing,
            RedditThingId::Comment {
                post_id: "jni5k5".to_string(),
                comment_id: "gb1mxkl".to_string(),
            }
        );
        assert_eq!(thing.fullname(), "t1_gb1mxkl");
        assert_eq!(thing.id(), "gb1mxkl");
    }

    #[test]
    fn reddit_old_host_and_bare_comments_path() {
        assert!(reddit_thing(
            "https://old.reddit.com/r/Warhammer40k/comments/jnaol2/my_halloween_costume_made_in_3_days_salamander/gb077ru?context=3"
        )
        .is_some());
        assert_eq!(
            reddit_thing("https://reddit.com/comments/abc123"),
            Some(RedditThingId::Post("abc123".to_string()))
        );
        assert_eq!(
            RedditThingId::Post("abc123".to_string()).fullname(),
            "t3_abc123"
        );
    }

    #[test]
    fn reddit_rejects_other_hosts_and_paths() {
        assert!(reddit_thing("https://reddit.com/r/rust").is_none());
        assert!(reddit_thing("https://notreddit.com/r/x/comments/abc").is_none());
        assert!(reddit_thing("https://example.com/comments/abc").is_none());
        assert!(reddit_thing("not a real url").is_none());
    }

    #[test]
    fn tweet_id_parses_numeric_status() {
        assert_eq!(
            tweet_id("https://twitter.com/Cephalofair/status/1328452020060254210"),
            Some(1_328_452_020_060_254_210)
        );
        assert_eq!(
            tweet_id("https://twitter.com/Cephalofair/status/1328452020060254210?stuff=tre#whatever"),
            Some(1_328_452_020_060_254_210)
        );
        assert_eq!(tweet_id("https://x.com/naval/statuses/42/"), Some(42));
        assert_eq!(tweet_id("https://mobile.twitter.com/a/status/7"), Some(7));
    }

    #[test]
    fn tweet_id_rejects_non_numeric_and_foreign_hosts() {
        assert_eq!(tweet_id("https://twitter.com/a/status/notanumber"), None);
        assert_eq!(tweet_id("https://twitter.com/naval"), None);
        assert_eq!(tweet_id("https://fox.com/a/status/123"), None);
        assert_eq!(tweet_id("https://example.com/status/123"), None);
    }

    #[test]
    fn youtube_query_and_short_host() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=DP0t2MmOMEA&t=432s").as_deref(),
            Some("DP0t2MmOMEA")
        );
        assert_eq!(
            youtube_video_id("https://youtu.be/DP0t2MmOMEA").as_deref(),
            Some("DP0t2MmOMEA")
        );
        assert_eq!(
            youtube_video_id("https://m.youtube.com/shorts/abc123").as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn youtube_without_id_does_not_match() {
        assert_eq!(youtube_video_id("https://www.youtube.com/"), None);
        assert_eq!(youtube_video_id("https://youtu.be/"), None);
        assert_eq!(youtube_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(youtube_video_id("https://youtube.com/channel/UCxyz"), None);
        assert_eq!(youtube_video_id("https://google.com/watch?v=abc"), None);
    }

    #[test]
    fn host_match_is_case_insensitive() {
        let url = Url::parse("https://OLD.Reddit.COM/r/x").unwrap();
        assert!(host_matches(&url, REDDIT_HOSTS));
        let url = Url::parse("https://reddit.com.evil.net/").unwrap();
        assert!(!host_matches(&url, REDDIT_HOSTS));
    }
}
