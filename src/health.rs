//! Liveness and readiness checks.
//!
//! | Check | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the backing file be read? Failure → no traffic. |

use std::sync::Arc;

use tracing::warn;

use crate::request::Request;
use crate::response::Response;
use crate::service::Todos;
use crate::status::Status;
use crate::store::TodoStore;

/// Always `200 OK` with body `"ok"`. No dependencies.
pub async fn liveness(_req: Request) -> &'static str {
    "ok"
}

/// `200 OK` with body `"ready"` while the store loads; `503` otherwise.
pub async fn readiness<S: TodoStore>(todos: Arc<Todos<S>>, _req: Request) -> Response {
    match todos.check_ready().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!("readiness check failed: {e}");
            Response::error(Status::ServiceUnavailable, "Store unavailable")
        }
    }
}
