use axum::extract::State;

use crate::app::{App, ReadinessError};

pub async fn ok() -> &'static str {
    "OK"
}

pub async fn readiness(State(app): State<App>) -> Result<&'static str, ReadinessError> {
    app.check_readiness().await?;

    Ok("OK")
}
