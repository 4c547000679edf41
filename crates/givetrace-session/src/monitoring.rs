//! Monitoring session binder
//!
//! Binds the monitoring client's lifecycle to the hosting view: init on
//! mount and on identity change, shutdown on unmount and before each
//! re-init. The contract is best-effort symmetry, not transactionality:
//! every attempted init owes exactly one attempted shutdown, including when
//! the init call itself failed, and a shutdown failure never interferes
//! with the init that follows it.

use crate::boundary::guard;
use crate::client::MonitoringClient;
use givetrace_core::SessionIdentity;

/// Lifecycle holder for the monitoring client.
pub struct MonitoringBinder<C: MonitoringClient> {
    client: C,
    last_identity: Option<SessionIdentity>,
    /// An init attempt is outstanding and owes a shutdown attempt.
    init_outstanding: bool,
}

impl<C: MonitoringClient> MonitoringBinder<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            last_identity: None,
            init_outstanding: false,
        }
    }

    /// Re-run the lifecycle effect if the identity changed since the last
    /// reconcile. A previously attempted init is shut down first; both the
    /// shutdown and the init are independently fault-isolated, so a failing
    /// shutdown never suppresses the re-init.
    pub fn reconcile(&mut self, identity: &SessionIdentity) {
        if self.last_identity.as_ref() == Some(identity) {
            return;
        }

        if self.init_outstanding {
            guard("monitoring shutdown", self.client.shutdown());
            self.init_outstanding = false;
        }

        tracing::debug!(identity = %identity, "Initializing monitoring session");
        guard("monitoring init", self.client.init(identity.as_deref()));
        self.init_outstanding = true;
        self.last_identity = Some(identity.clone());
    }

    /// Tear down the monitoring session. Idempotent: only the first close
    /// after an init attempt performs a shutdown attempt.
    pub fn close(&mut self) {
        if self.init_outstanding {
            guard("monitoring shutdown", self.client.shutdown());
            self.init_outstanding = false;
        }
    }
}

impl<C: MonitoringClient> Drop for MonitoringBinder<C> {
    fn drop(&mut self) {
        // A binder dropped without close() still owes its shutdown.
        self.close();
    }
}
