use std::fmt::{self, Debug, Formatter};

/// Password typed into a workflow form, masked when debug printed.
///
/// An empty string counts as no password, exactly like an untouched field.
#[derive(Default, Clone, Eq, PartialEq)]
pub struct Password(Option<String>);

impl Password {
    /// The password if one was entered
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref().filter(|p| !p.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_none()
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(password) = self.get() {
            write!(f, "Password({})", "*".repeat(password.len()))
        } else {
            write!(f, "Password(None)")
        }
    }
}

impl From<Option<String>> for Password {
    fn from(password: Option<String>) -> Self {
        Self(password)
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self(Some(password))
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self(Some(password.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_treat_empty_input_as_no_password() {
        let password: Password = "".into();
        assert!(password.is_empty());
        assert_eq!(password.get(), None);

        let password: Password = None.into();
        assert!(password.is_empty());
    }

    #[test]
    fn should_keep_whitespace_passwords() {
        let password: Password = " ".into();
        assert_eq!(password.get(), Some(" "));
    }

    #[test]
    fn test_debug() {
        let password: Password = None.into();
        assert_eq!(format!("{:?}", password), "Password(None)");

        let mut password: Password = "secret".into();
        assert_eq!(format!("{:?}", password), "Password(******)");

        password.clear();
        assert_eq!(format!("{:?}", password), "Password(None)");
    }
}
