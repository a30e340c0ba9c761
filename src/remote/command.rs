use std::fmt::Display;

use url::form_urlencoded;

/// A server command with form-encoded arguments, e.g. `getClassSize?file=a.rma6&classId=2`
pub struct Command {
    name: &'static str,
    args: form_urlencoded::Serializer<'static, String>,
    has_args: bool,
}

impl Command {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: form_urlencoded::Serializer::new(String::new()),
            has_args: false,
        }
    }

    #[must_use]
    pub fn arg(mut self, key: &str, value: impl Display) -> Self {
        self.args.append_pair(key, &value.to_string());
        self.has_args = true;
        self
    }

    pub fn build(mut self) -> String {
        if self.has_args {
            format!("{}?{}", self.name, self.args.finish())
        } else {
            self.name.to_string()
        }
    }
}
