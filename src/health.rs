//! Liveness and readiness probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can the store be reached? |

use tracing::warn;

use crate::blogs::Store;
use crate::{Request, Response, Status};

/// Always `200 OK` with body `"ok"`. If the process can answer HTTP at all
/// it is alive, so this has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"` when the store answers a ping, otherwise
/// `503 Service Unavailable`.
pub async fn readiness(_req: Request, store: Store) -> Response {
    match store.ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            Response::builder()
                .status(Status::ServiceUnavailable)
                .text("unavailable")
        }
    }
}
