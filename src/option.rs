//! Include / exclude toggles for enumerable option lists
//!
//! An option token is either `value` (include) or `!value` (exclude). This is
//! separate from filter-clause negation and involves no grammar.

use serde::{Deserialize, Serialize};

/// A parsed option token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionToken {
    /// `false` when the token was written with a leading `!`
    pub is: bool,
    #[serde(rename = "type")]
    pub option_type: String,
}

impl OptionToken {
    /// Render back to token text
    pub fn to_token(&self) -> String {
        if self.is {
            self.option_type.clone()
        } else {
            format!("!{}", self.option_type)
        }
    }
}

/// Split a leading `!` off an option token
pub fn negate_option(token: &str) -> OptionToken {
    match token.strip_prefix('!') {
        Some(rest) => OptionToken {
            is: false,
            option_type: rest.to_string(),
        },
        None => OptionToken {
            is: true,
            option_type: token.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_negate_option() {
        assert_eq!(
            negate_option("!foo"),
            OptionToken {
                is: false,
                option_type: "foo".to_string()
            }
        );
        assert_eq!(
            negate_option("foo"),
            OptionToken {
                is: true,
                option_type: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_only_one_bang_is_stripped() {
        let token = negate_option("!!foo");
        assert!(!token.is);
        assert_eq!(token.option_type, "!foo");
    }

    #[test]
    fn test_edge_tokens() {
        assert_eq!(negate_option(""), OptionToken { is: true, option_type: String::new() });
        assert_eq!(negate_option("!"), OptionToken { is: false, option_type: String::new() });
        assert!(negate_option(" !foo").is);
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_string(&negate_option("!active")).unwrap();
        assert_eq!(json, r#"{"is":false,"type":"active"}"#);
    }

    proptest! {
        #[test]
        fn prop_token_round_trip(token in "!?[a-z_]{0,12}") {
            prop_assert_eq!(negate_option(&token).to_token(), token);
        }
    }
}
