use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum RegistryError {
    Network(String),
    Http(String),
    XmlParse(String),
    Api(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Network(msg) => write!(f, "Network error: {msg}"),
            RegistryError::Http(msg) => write!(f, "HTTP error: {msg}"),
            RegistryError::XmlParse(msg) => write!(f, "XML parse error: {msg}"),
            RegistryError::Api(msg) => write!(f, "Registry API error: {msg}"),
        }
    }
}

impl Error for RegistryError {}
