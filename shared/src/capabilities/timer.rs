use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One-shot timers keyed by a caller-chosen id.
pub struct Timer<Ev> {
    context: CapabilityContext<TimerOperation, Ev>,
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<Ev> Timer<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<TimerOperation, Ev>) -> Self {
        Self { context }
    }

    /// Emits `make_event(output)` once the shell reports the timer as
    /// elapsed or cancelled.
    pub fn start<F>(&self, id: impl Into<String>, after: Duration, make_event: F)
    where
        F: FnOnce(TimerOutput) -> Ev + Send + 'static,
    {
        let operation = TimerOperation::Start {
            id: id.into(),
            millis: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        };

        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(output));
        });
    }

    pub fn cancel(&self, id: impl Into<String>) {
        let operation = TimerOperation::Cancel { id: id.into() };

        let ctx = self.context.clone();
        // The shell answers the pending `Start` with `Cancelled`.
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerOperation {
    Start { id: String, millis: u64 },
    Cancel { id: String },
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerOutput {
    Elapsed { id: String },
    Cancelled { id: String },
}

impl TimerOutput {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Elapsed { id } | Self::Cancelled { id } => id,
        }
    }
}
