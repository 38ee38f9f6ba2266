use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed TOML, a missing field, or a theme or piece name outside the
  /// vocabulary.
  #[error("curriculum parse error: {0}")]
  Parse(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
