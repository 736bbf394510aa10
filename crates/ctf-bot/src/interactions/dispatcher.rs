//! Task-per-interaction dispatch
//!
//! Every interaction runs as its own tracked task with a cancellation token
//! derived from the process shutdown token. The token is also cancelled when
//! the per-interaction deadline elapses.
//!
//! Immediate routes are answered in the HTTP response and must finish inside
//! the platform's acknowledgement window. Deferred routes are acknowledged at
//! once; their task delivers the reply by editing the original response.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info_span, warn, Instrument, Span};
use uuid::Uuid;

use ctf_discord::MessagePayload;
use ctf_service::{
    CtfService, GuardContext, GuardService, InfoService, Invocation, ListEventsRequest, Reply,
    ServiceContext, ServiceError, ServiceResult,
};

use super::followup::FollowUp;
use super::payload::InteractionResponse;
use super::route::{Acknowledgement, Route};
use crate::response::error_reply;

/// Longest an immediate route may run; the platform drops answers after 3s
pub const ACK_DEADLINE: Duration = Duration::from_millis(2500);

/// Runs routed interactions against the service layer
pub struct Dispatcher {
    ctx: Arc<ServiceContext>,
    follow_up: Arc<dyn FollowUp>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
    deadline: Duration,
}

impl Dispatcher {
    pub fn new(
        ctx: Arc<ServiceContext>,
        follow_up: Arc<dyn FollowUp>,
        tracker: TaskTracker,
        shutdown: CancellationToken,
        deadline: Duration,
    ) -> Self {
        Self {
            ctx,
            follow_up,
            tracker,
            shutdown,
            deadline,
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Acknowledge the interaction as its route requires
    pub async fn respond(
        &self,
        interaction_token: String,
        invocation: Invocation,
        route: Route,
    ) -> InteractionResponse {
        match route.acknowledgement() {
            Acknowledgement::Immediate => {
                InteractionResponse::from(&self.dispatch(invocation, route).await)
            }
            Acknowledgement::DeferredMessage => {
                self.defer(interaction_token, invocation, route);
                InteractionResponse::deferred_message()
            }
            Acknowledgement::DeferredUpdate => {
                self.defer(interaction_token, invocation, route);
                InteractionResponse::deferred_update()
            }
        }
    }

    /// Run `route` for `invocation` and render its outcome
    pub async fn dispatch(&self, invocation: Invocation, route: Route) -> Reply {
        let span = interaction_span(&invocation, &route);
        let ctx = Arc::clone(&self.ctx);
        let token = self.shutdown.child_token();
        let deadline = self.deadline.min(ACK_DEADLINE);

        let task = self.tracker.spawn(
            async move { run_to_reply(&ctx, &invocation, &route, &token, deadline).await }
                .instrument(span),
        );

        match task.await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Interaction task failed");
                error_reply(&ServiceError::internal(e.to_string()))
            }
        }
    }

    /// Run `route` in the background and edit its reply into the response
    pub fn defer(&self, interaction_token: String, invocation: Invocation, route: Route) {
        let span = interaction_span(&invocation, &route);
        let ctx = Arc::clone(&self.ctx);
        let follow_up = Arc::clone(&self.follow_up);
        let token = self.shutdown.child_token();
        let deadline = self.deadline;

        self.tracker.spawn(
            async move {
                let reply = run_to_reply(&ctx, &invocation, &route, &token, deadline).await;
                let payload = MessagePayload::from(&reply.message);
                if let Err(e) = follow_up.edit_original(&interaction_token, &payload).await {
                    warn!(error = %e, "Deferred reply not delivered");
                }
            }
            .instrument(span),
        );
    }
}

fn interaction_span(invocation: &Invocation, route: &Route) -> Span {
    info_span!(
        "interaction",
        id = %Uuid::new_v4(),
        route = route.name(),
        user_id = %invocation.user_id,
        channel_id = %invocation.channel_id,
    )
}

async fn run_to_reply(
    ctx: &ServiceContext,
    invocation: &Invocation,
    route: &Route,
    token: &CancellationToken,
    deadline: Duration,
) -> Reply {
    match run_with_deadline(ctx, invocation, route, token, deadline).await {
        Ok(reply) => reply,
        Err(e) => {
            debug!(code = e.error_code(), kind = e.kind().as_str(), "Workflow rejected");
            error_reply(&e)
        }
    }
}

async fn run_with_deadline(
    ctx: &ServiceContext,
    invocation: &Invocation,
    route: &Route,
    token: &CancellationToken,
    deadline: Duration,
) -> ServiceResult<Reply> {
    let expire = token.clone();
    let timer = tokio::spawn(async move {
        tokio::time::sleep(deadline).await;
        expire.cancel();
    });

    let result = execute(ctx, invocation, route, token).await;
    timer.abort();
    result
}

/// Guard, then workflow
pub async fn execute(
    ctx: &ServiceContext,
    invocation: &Invocation,
    route: &Route,
    token: &CancellationToken,
) -> ServiceResult<Reply> {
    let guard = GuardService::new(ctx)
        .check(route.guard(), invocation)
        .await?;

    let ctfs = CtfService::new(ctx);
    let info = InfoService::new(ctx);
    let weeks = |weeks: Option<u32>| ListEventsRequest {
        weeks: weeks.unwrap_or(ctx.settings().default_weeks),
    };

    match route {
        Route::Ping => Ok(ctfs.ping()),
        Route::Info { weeks: w } => info.info(&weeks(*w), token).await,
        Route::Vote { weeks: w } => info.vote(invocation, &weeks(*w), token).await,
        Route::New(request) => ctfs.confirm_create(request, token).await,
        Route::Create(request) => ctfs.create(invocation, request, token).await,
        Route::Open => ctfs.set_can_join(&resolved(guard)?, true, token).await,
        Route::Close => ctfs.set_can_join(&resolved(guard)?, false, token).await,
        Route::Delete => Ok(ctfs.confirm_delete(&resolved(guard)?)),
        Route::DeleteConfirmed => ctfs.delete(&resolved(guard)?, token).await,
        Route::Join { ctf } => ctfs.join(invocation, &resolved(guard)?, ctf, token).await,
        Route::Mark(marker) => {
            ctfs.mark_solved(invocation, &resolved(guard)?, *marker, token)
                .await
        }
        Route::Chal(request) => ctfs.new_challenge(&resolved(guard)?, request, token).await,
    }
}

fn resolved(guard: Option<GuardContext>) -> ServiceResult<GuardContext> {
    guard.ok_or_else(|| ServiceError::internal("route guard resolved no CTF"))
}
