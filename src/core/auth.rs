use crate::domain::model::{GraphqlError, ResponseOutcome};

const UNAUTHENTICATED_CODE: &str = "UNAUTHENTICATED";

/// 訊息中出現這些字樣（不分大小寫）即視為 session 失效
const UNAUTHENTICATED_MARKERS: &[&str] = &[
    "unauthenticated",
    "not authenticated",
    "jwt expired",
    "token expired",
];

pub fn is_auth_failure(outcome: &ResponseOutcome<'_>) -> bool {
    match outcome {
        ResponseOutcome::HttpError(status) => *status == 401,
        ResponseOutcome::GraphqlErrors { errors, .. } => errors.iter().any(is_auth_error),
        ResponseOutcome::Success(_) => false,
    }
}

pub fn is_auth_error(error: &GraphqlError) -> bool {
    if error.code() == Some(UNAUTHENTICATED_CODE) {
        return true;
    }

    let message = error.message.to_lowercase();
    UNAUTHENTICATED_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
