use thiserror::Error;

pub type VerifyResult<T> = Result<T, VerifyError>;

/// Errors surfaced by the confidence aggregator.
///
/// Individual agent failures never appear here: they are substituted
/// with neutral defaults and flagged on the outcome instead. Only a
/// misconfigured engine fails outright.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("no signal agents configured")]
    NoSignals,
}
