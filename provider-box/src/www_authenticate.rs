//! `WWW-Authenticate` challenge inspection.
//!
//! Box reports why a bearer token was refused in the challenge header:
//!
//! ```text
//! Bearer realm="Service", error="invalid_token", error_description="The access token provided is invalid."
//! ```

/// The `error` / `error_description` auth-params of a challenge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthChallenge {
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Extract `error` and `error_description` from a `WWW-Authenticate` value.
///
/// Quoted values may contain commas and `\"` escapes. Unknown parameters and
/// the leading scheme are ignored.
pub fn parse_www_authenticate(header: &str) -> AuthChallenge {
    let mut challenge = AuthChallenge::default();

    for (name, value) in auth_params(header) {
        match name.as_str() {
            "error" => challenge.error = Some(value),
            "error_description" => challenge.error_description = Some(value),
            _ => {}
        }
    }

    challenge
}

fn auth_params(header: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut chars = header.chars().peekable();

    loop {
        // name: run of token chars, skipping separators and the scheme word
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' {
                break;
            }
            chars.next();
            if c == ',' || c.is_whitespace() {
                name.clear();
            } else {
                name.push(c);
            }
        }
        if chars.next().is_none() {
            break;
        }

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => value.push(c),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                value.push(c);
                chars.next();
            }
            value = value.trim().to_string();
        }

        params.push((name.to_ascii_lowercase(), value));
    }

    params
}
