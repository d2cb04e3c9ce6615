use serde::{Deserialize, Serialize};

/// Name shown when nobody is signed in.
pub const GUEST_NAME: &str = "Guest";

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub display_name: String,
}

impl CurrentUser {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }

    /// First word of the display name, if there is one.
    pub fn first_name(&self) -> Option<&str> {
        self.display_name.split_whitespace().next()
    }
}

/// Name used in greetings: the user's first name, or [`GUEST_NAME`].
pub fn greeting_name(user: Option<&CurrentUser>) -> &str {
    user.and_then(CurrentUser::first_name).unwrap_or(GUEST_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_takes_first_word() {
        let user = CurrentUser::new("Ada Lovelace");
        assert_eq!(user.first_name(), Some("Ada"));
    }

    #[test]
    fn test_first_name_blank_display_name() {
        let user = CurrentUser::new("   ");
        assert_eq!(user.first_name(), None);
        assert_eq!(greeting_name(Some(&user)), GUEST_NAME);
    }

    #[test]
    fn test_greeting_name_anonymous() {
        assert_eq!(greeting_name(None), "Guest");
    }
}
