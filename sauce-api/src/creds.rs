use std::fmt;

#[derive(Clone)]
pub struct Creds {
    username: String,
    password: String,
}

impl Creds {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// The bare account name, without the institutional domain suffix.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Creds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creds")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .finish()
    }
}
