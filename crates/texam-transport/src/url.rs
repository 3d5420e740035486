//! Push URL parsing.
//!
//! Accepted forms:
//! - http[s]://host[:port]/path
//! - file:///path
//! - /local/path, ./relative/path, C:\windows\path

use crate::{RemoteUrl, Scheme, TransportError};

impl RemoteUrl {
    pub fn parse(url: &str) -> Result<Self, TransportError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(TransportError::InvalidUrl("empty URL".into()));
        }

        if let Some(rest) = url.strip_prefix("http://") {
            return parse_standard(Scheme::Http, rest);
        }
        if let Some(rest) = url.strip_prefix("https://") {
            return parse_standard(Scheme::Https, rest);
        }
        if let Some(rest) = url.strip_prefix("file://") {
            if rest.is_empty() {
                return Err(TransportError::InvalidUrl("empty file path".into()));
            }
            return Ok(RemoteUrl {
                scheme: Scheme::File,
                host: None,
                port: None,
                path: rest.to_string(),
            });
        }

        if let Some((scheme, _)) = url.split_once("://") {
            return Err(TransportError::UnsupportedScheme(scheme.to_string()));
        }

        let is_drive_path = url.len() >= 2
            && url.as_bytes()[0].is_ascii_alphabetic()
            && url.as_bytes()[1] == b':';
        if url.contains(':') && !is_drive_path {
            return Err(TransportError::UnsupportedScheme(format!(
                "scp-like address {url}"
            )));
        }

        Ok(RemoteUrl {
            scheme: Scheme::Local,
            host: None,
            port: None,
            path: url.to_string(),
        })
    }

    /// The URL an HTTP client should request.
    pub fn http_url(&self) -> String {
        let host = match self.host.as_deref() {
            Some(host) if host.contains(':') => format!("[{host}]"),
            Some(host) => host.to_string(),
            None => String::new(),
        };
        format!(
            "{}://{}{}{}",
            self.scheme,
            host,
            self.port.map(|p| format!(":{p}")).unwrap_or_default(),
            self.path
        )
    }
}

/// Parse `host[:port]/path`, the scheme already stripped.
fn parse_standard(scheme: Scheme, rest: &str) -> Result<RemoteUrl, TransportError> {
    let (authority, path) = match rest.find('/') {
        Some(slash_pos) => (&rest[..slash_pos], &rest[slash_pos..]),
        None => (rest, "/"),
    };

    if authority.contains('@') {
        return Err(TransportError::InvalidUrl(
            "credentials belong in the config, not the URL".into(),
        ));
    }

    let (host, port) = if authority.starts_with('[') {
        let Some(bracket_end) = authority.find(']') else {
            return Err(TransportError::InvalidUrl("unclosed IPv6 bracket".into()));
        };
        let host = &authority[1..bracket_end];
        let port = match authority[bracket_end + 1..].strip_prefix(':') {
            Some(port_str) => Some(parse_port(port_str)?),
            None => None,
        };
        (host.to_string(), port)
    } else if let Some((host, port_str)) = authority.rsplit_once(':') {
        (host.to_string(), Some(parse_port(port_str)?))
    } else {
        (authority.to_string(), None)
    };

    if host.is_empty() {
        return Err(TransportError::InvalidUrl("empty host".into()));
    }

    Ok(RemoteUrl {
        scheme,
        host: Some(host),
        port,
        path: path.to_string(),
    })
}

fn parse_port(port_str: &str) -> Result<u16, TransportError> {
    port_str
        .parse::<u16>()
        .map_err(|_| TransportError::InvalidUrl(format!("invalid port: {port_str}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_https_url() {
        let url = RemoteUrl::parse("https://exams.example.org/submit").unwrap();
        assert_eq!(url.scheme, Scheme::Https);
        assert_eq!(url.host.as_deref(), Some("exams.example.org"));
        assert_eq!(url.path, "/submit");
        assert_eq!(url.port, None);
    }

    #[test]
    fn parse_http_with_port() {
        let url = RemoteUrl::parse("http://127.0.0.1:8080/upload").unwrap();
        assert_eq!(url.scheme, Scheme::Http);
        assert_eq!(url.port, Some(8080));
        assert_eq!(url.http_url(), "http://127.0.0.1:8080/upload");
    }

    #[test]
    fn parse_host_only() {
        let url = RemoteUrl::parse("http://example.com").unwrap();
        assert_eq!(url.path, "/");
    }

    #[test]
    fn parse_ipv6_host() {
        let url = RemoteUrl::parse("http://[::1]:9000/x").unwrap();
        assert_eq!(url.host.as_deref(), Some("::1"));
        assert_eq!(url.port, Some(9000));
        assert_eq!(url.http_url(), "http://[::1]:9000/x");
    }

    #[test]
    fn parse_file_url() {
        let url = RemoteUrl::parse("file:///srv/inbox").unwrap();
        assert_eq!(url.scheme, Scheme::File);
        assert_eq!(url.path, "/srv/inbox");
        assert_eq!(url.to_string(), "file:///srv/inbox");
    }

    #[test]
    fn parse_local_paths() {
        for path in ["/srv/inbox", "./inbox", "inbox", "C:\\inbox"] {
            let url = RemoteUrl::parse(path).unwrap();
            assert_eq!(url.scheme, Scheme::Local, "{path}");
            assert_eq!(url.path, path);
        }
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            RemoteUrl::parse("ssh://host/path"),
            Err(TransportError::UnsupportedScheme(s)) if s == "ssh"
        ));
        assert!(matches!(
            RemoteUrl::parse("git@host:repo"),
            Err(TransportError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(RemoteUrl::parse("").is_err());
        assert!(RemoteUrl::parse("http://:80/").is_err());
        assert!(RemoteUrl::parse("http://host:notaport/").is_err());
        assert!(RemoteUrl::parse("https://user:pw@host/").is_err());
    }
}
