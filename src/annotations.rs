//! Field annotations.
//!
//! Raw annotation text uses space separated `key:"value"` pairs:
//!
//! ```text
//! json:"name,omitempty" swagger:"required" description:"Display name"
//! ```
//!
//! Recognised keys: `json` (serialization name, `-` to ignore), `swagger`
//! (comma separated flags, `required`) and `description`. Unknown keys are
//! ignored. Anything that is not a well-formed sequence of pairs is rejected
//! as a whole and the field falls back to its declared name.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s:"]+):"((?:[^"\\]|\\.)*)""#).expect("annotation pair pattern is valid")
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotations {
    pub serialization_name: Option<String>,
    pub ignore: bool,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("unexpected text {found:?} at byte {offset} in annotation {tag:?}")]
    Unexpected { tag: String, offset: usize, found: String },
}

impl Annotations {
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let mut out = Annotations::default();
        let mut seen: Vec<&str> = Vec::new();
        let mut cursor = 0;

        for caps in PAIR.captures_iter(raw) {
            let (Some(whole), Some(key), Some(value)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            check_gap(raw, cursor, whole.start())?;
            cursor = whole.end();

            // first occurrence of a key wins
            let key = key.as_str();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            out.apply(key, &unescape(value.as_str()));
        }
        check_gap(raw, cursor, raw.len())?;
        Ok(out)
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "json" => {
                if value == "-" {
                    self.ignore = true;
                    return;
                }
                let name = value.split(',').next().unwrap_or_default();
                if !name.is_empty() {
                    self.serialization_name = Some(name.to_string());
                }
            }
            "swagger" => {
                if value.split(',').any(|flag| flag.trim() == "required") {
                    self.required = true;
                }
            }
            "description" => {
                if !value.is_empty() {
                    self.description = Some(value.to_string());
                }
            }
            _ => {}
        }
    }
}

// Only whitespace may separate pairs.
fn check_gap(raw: &str, from: usize, to: usize) -> Result<(), TagError> {
    let gap = &raw[from..to];
    match gap.find(|c: char| !c.is_whitespace()) {
        None => Ok(()),
        Some(at) => Err(TagError::Unexpected {
            tag: raw.to_string(),
            offset: from + at,
            found: gap.trim().to_string(),
        }),
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag_has_no_overrides() {
        assert_eq!(Annotations::parse("").unwrap(), Annotations::default());
        assert_eq!(Annotations::parse("   ").unwrap(), Annotations::default());
    }

    #[test]
    fn json_name_and_options() {
        let a = Annotations::parse(r#"json:"root,omitempty""#).unwrap();
        assert_eq!(a.serialization_name.as_deref(), Some("root"));
        assert!(!a.ignore);

        // options without a name keep the declared name
        let a = Annotations::parse(r#"json:",omitempty""#).unwrap();
        assert_eq!(a.serialization_name, None);
    }

    #[test]
    fn dash_ignores_but_dash_comma_is_a_name() {
        assert!(Annotations::parse(r#"json:"-""#).unwrap().ignore);
        let a = Annotations::parse(r#"json:"-,""#).unwrap();
        assert!(!a.ignore);
        assert_eq!(a.serialization_name.as_deref(), Some("-"));
    }

    #[test]
    fn multiple_keys() {
        let a = Annotations::parse(
            r#"json:"id" swagger:"required" description:"the \"primary\" key""#,
        )
        .unwrap();
        assert_eq!(a.serialization_name.as_deref(), Some("id"));
        assert!(a.required);
        assert_eq!(a.description.as_deref(), Some(r#"the "primary" key"#));
    }

    #[test]
    fn first_key_wins() {
        let a = Annotations::parse(r#"json:"a" json:"b""#).unwrap();
        assert_eq!(a.serialization_name.as_deref(), Some("a"));
    }

    #[test]
    fn malformed_tags_are_rejected() {
        for raw in [r#"json:root"#, r#"json:"unterminated"#, r#"json:"a" swagger"#] {
            let err = Annotations::parse(raw).unwrap_err();
            let TagError::Unexpected { tag, .. } = err;
            assert_eq!(tag, raw);
        }
    }
}
