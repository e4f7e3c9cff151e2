use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    #[error("unknown player '{name}' for {team}")]
    UnknownPlayer { team: String, name: String },

    #[error("{0} is not at the crease")]
    NotAtCrease(String),

    #[error("unseen dismissal kind '{0}'")]
    UnknownDismissal(String),

    #[error("dismissal '{0}' requires a fielder")]
    MissingFielder(String),

    #[error("malformed date '{0}'")]
    MalformedDate(String),

    #[error("delivery bowled outside of an over")]
    NoOver,
}
