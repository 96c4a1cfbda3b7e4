/// Failures that end a status run. Each maps to exit code 2.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("Error initializing client: {0:#}")]
    ClientInit(anyhow::Error),

    #[error("Error checking seal status: {0:#}")]
    SealQuery(anyhow::Error),

    #[error("Error checking leader status: {0:#}")]
    LeaderQuery(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn message_flattens_cause_chain_on_one_line() {
        let cause = Err::<(), _>(anyhow::anyhow!("connection refused"))
            .context("error sending request")
            .unwrap_err();

        let message = StatusError::SealQuery(cause).to_string();

        assert_eq!(
            message,
            "Error checking seal status: error sending request: connection refused"
        );
        assert!(!message.contains('\n'));
    }
}
