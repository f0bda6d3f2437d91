//! Pattern-based token extraction.
//!
//! # Invariants
//! - Token order follows left-to-right occurrence in the input.
//! - Repeated tokens are reported once per occurrence (no de-duplication).
//! - Mention/hashtag patterns are not anchored against a preceding word
//!   character: `foo@bar` yields the mention `bar`.
//! - A word character is a Unicode letter, a Unicode number or `_`.
//!   Combining marks and connector punctuation other than `_` end a token.

use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};
use serde::Serialize;

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([\p{L}\p{N}_]+)").expect("valid mention regex"));
static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([\p{L}\p{N}_]+)").expect("valid hashtag regex"));
// `regex` has no lookaround and its `\b` counts marks as word characters, so
// both word boundaries are spelled out as neighbour characters. Group 1 holds
// addresses starting with a word character, group 2 those starting with
// `.%+-`, which need a word character on their left.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:^|[^\p{L}\p{N}_])",
        r"([A-Za-z0-9_][A-Za-z0-9._%+-]*@[A-Za-z0-9.-]+\.[A-Za-z]{2,})",
        r"(?:[^\p{L}\p{N}_]|$)",
        r"|[\p{L}\p{N}_]",
        r"([.%+-][A-Za-z0-9._%+-]*@[A-Za-z0-9.-]+\.[A-Za-z]{2,})",
        r"(?:[^\p{L}\p{N}_]|$)",
    ))
    .expect("valid email regex")
});
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid link regex"));

/// All four token categories extracted from one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextEntities {
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    pub emails: Vec<String>,
    pub links: Vec<String>,
}

/// Extracts `@handle` tokens without the leading `@`.
pub fn extract_mentions(text: &str) -> Vec<String> {
    capture_group(&MENTION_RE, text)
}

/// Extracts `#tag` tokens without the leading `#`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    capture_group(&HASHTAG_RE, text)
}

/// Extracts `local@domain.tld` addresses as full matches.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut emails = Vec::new();
    let mut start = 0;
    while let Some(caps) = EMAIL_RE.captures_at(text, start) {
        let Some(address) = email_address(&caps) else {
            break;
        };
        emails.push(address.as_str().to_string());
        // The address ends in an ASCII letter, which can be the left
        // neighbour of an address starting with `.%+-`.
        start = address.end() - 1;
    }
    emails
}

/// Extracts `http://` / `https://` links up to the next whitespace.
pub fn extract_links(text: &str) -> Vec<String> {
    full_match(&LINK_RE, text)
}

/// Runs every extractor over `text`.
pub fn extract_all(text: &str) -> TextEntities {
    TextEntities {
        mentions: extract_mentions(text),
        hashtags: extract_hashtags(text),
        emails: extract_emails(text),
        links: extract_links(text),
    }
}

fn capture_group(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn email_address<'t>(caps: &Captures<'t>) -> Option<Match<'t>> {
    caps.get(1).or_else(|| caps.get(2))
}

fn full_match(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        extract_all, extract_emails, extract_hashtags, extract_links, extract_mentions,
        TextEntities,
    };

    #[test]
    fn mentions_keep_order_and_strip_marker() {
        assert_eq!(
            extract_mentions("Hello @devteam @user123 check this"),
            vec!["devteam", "user123"]
        );
    }

    #[test]
    fn hashtags_keep_order_and_strip_marker() {
        assert_eq!(
            extract_hashtags("Working on #project #urgent #tasks"),
            vec!["project", "urgent", "tasks"]
        );
    }

    #[test]
    fn emails_are_returned_whole() {
        assert_eq!(
            extract_emails("Contact us at test@example.com and admin@site.org"),
            vec!["test@example.com", "admin@site.org"]
        );
    }

    #[test]
    fn links_stop_at_whitespace() {
        assert_eq!(
            extract_links("Visit https://example.com and http://test.org"),
            vec!["https://example.com", "http://test.org"]
        );
    }

    #[test]
    fn links_are_greedy_to_end_of_token() {
        assert_eq!(
            extract_links("see https://example.com/a?b=1#frag, then stop"),
            vec!["https://example.com/a?b=1#frag,"]
        );
        assert!(extract_links("https:// nothing").is_empty());
        assert!(extract_links("ftp://example.com").is_empty());
    }

    #[test]
    fn duplicates_are_reported_per_occurrence() {
        assert_eq!(extract_mentions("@a @b @a"), vec!["a", "b", "a"]);
        assert_eq!(extract_hashtags("#x#x"), vec!["x", "x"]);
    }

    #[test]
    fn mention_inside_email_is_still_matched() {
        let text = "ping user@domain.com";
        assert_eq!(extract_mentions(text), vec!["domain"]);
        assert_eq!(extract_emails(text), vec!["user@domain.com"]);
        assert_eq!(extract_mentions("foo@bar"), vec!["bar"]);
    }

    #[test]
    fn markers_without_word_chars_are_ignored() {
        assert!(extract_mentions("@ alone, @!").is_empty());
        assert!(extract_hashtags("# heading").is_empty());
    }

    #[test]
    fn word_chars_include_unicode_letters() {
        assert_eq!(extract_mentions("hola @josé"), vec!["josé"]);
        assert_eq!(extract_hashtags("#día_1"), vec!["día_1"]);
    }

    #[test]
    fn combining_marks_and_connectors_end_handles() {
        assert_eq!(extract_mentions("@e\u{301}x @a\u{203f}b"), vec!["e", "a"]);
        assert_eq!(extract_hashtags("#e\u{301}x #a\u{203f}b"), vec!["e", "a"]);
        assert_eq!(extract_mentions("@a_b @x\u{200d}y"), vec!["a_b", "x"]);
        assert_eq!(extract_hashtags("#\u{301}x"), Vec::<String>::new());
    }

    #[test]
    fn email_boundaries_ignore_combining_marks() {
        assert_eq!(extract_emails("a@b.com\u{301}"), vec!["a@b.com"]);
        assert_eq!(extract_emails("x\u{301}a@b.com"), vec!["a@b.com"]);
        assert!(extract_emails("éa@b.com").is_empty());
        assert!(extract_emails("a@b.comé").is_empty());
    }

    #[test]
    fn adjacent_emails_are_all_found() {
        assert_eq!(
            extract_emails("a@b.com b@c.org,c@d.net"),
            vec!["a@b.com", "b@c.org", "c@d.net"]
        );
        assert_eq!(
            extract_emails("a@b.com+c@d.org"),
            vec!["a@b.com", "+c@d.org"]
        );
        assert_eq!(extract_emails(".a@b.com"), vec!["a@b.com"]);
    }

    #[test]
    fn emails_need_two_letter_tld() {
        assert!(extract_emails("a@b.c").is_empty());
        assert_eq!(
            extract_emails("first.last+tag@mail-server.co.uk"),
            vec!["first.last+tag@mail-server.co.uk"]
        );
    }

    #[test]
    fn plain_text_yields_nothing() {
        for text in ["", "   ", "buy milk", "50% off - today only!"] {
            let entities = extract_all(text);
            assert_eq!(entities, TextEntities::default(), "unexpected tokens for {text:?}");
        }
    }

    #[test]
    fn extract_all_combines_categories() {
        let entities =
            extract_all("Test task @user #project email@test.com https://example.com");
        assert_eq!(entities.mentions, vec!["user", "test"]);
        assert_eq!(entities.hashtags, vec!["project"]);
        assert_eq!(entities.emails, vec!["email@test.com"]);
        assert_eq!(entities.links, vec!["https://example.com"]);
    }
}
